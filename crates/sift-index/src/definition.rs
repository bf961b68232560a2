//! Complete index definition: settings plus one schema per mapping type.

use serde_json::{Map, Value, json};
use sift_config::Config;

use crate::{analyzer::analysis_settings, mapping::MappingBuilder, schema::Schema};

/// Prefix of the mapping types that hold taxonomy term documents.
pub const TAXONOMY_TYPE_PREFIX: &str = "taxonomy_";

/// Everything needed to create the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    /// Number of primary shards.
    pub shards: u32,
    /// Number of replicas per shard.
    pub replicas: u32,
    /// Analyzer and token filter definitions.
    pub analysis: Value,
    /// Schemas by mapping type: content types first, then taxonomies.
    pub mappings: Vec<(String, Schema)>,
}

impl IndexDefinition {
    /// Builds the definition for every configured content type and taxonomy.
    pub fn new(config: &Config, builder: &MappingBuilder<'_>) -> Self {
        let content_types = config
            .index
            .content_types
            .iter()
            .map(|ct| (ct.clone(), builder.build_for(ct)));
        let taxonomies = config.fields.taxonomies.iter().map(|taxonomy| {
            (
                format!("{TAXONOMY_TYPE_PREFIX}{taxonomy}"),
                builder.taxonomy_schema(),
            )
        });

        Self {
            shards: config.index.shards,
            replicas: config.index.replicas,
            analysis: analysis_settings(),
            mappings: content_types.chain(taxonomies).collect(),
        }
    }

    /// Returns the schema of a mapping type.
    pub fn mapping(&self, name: &str) -> Option<&Schema> {
        self.mappings
            .iter()
            .find(|(type_name, _)| type_name == name)
            .map(|(_, schema)| schema)
    }

    /// Renders the definition as an index-creation body.
    pub fn to_json(&self) -> Value {
        let mappings: Map<String, Value> = self
            .mappings
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_json()))
            .collect();
        json!({
            "settings": {
                "number_of_shards": self.shards,
                "number_of_replicas": self.replicas,
                "analysis": self.analysis,
            },
            "mappings": mappings,
        })
    }
}

#[cfg(test)]
mod tests {
    use sift_config::FieldConfig;

    use super::*;
    use crate::{analyzer::NGRAM_ANALYZER, schema::FieldMapping};

    fn config() -> Config {
        Config {
            fields: FieldConfig {
                fields: vec!["post_title".into()],
                taxonomies: vec!["category".into(), "post_tag".into()],
                ..FieldConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn declares_content_types_then_taxonomies() {
        let config = config();
        let definition = IndexDefinition::new(&config, &MappingBuilder::new(&config));
        let names: Vec<&str> = definition.mappings.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec!["post", "page", "taxonomy_category", "taxonomy_post_tag"]
        );
        assert!(definition.mapping("taxonomy_category").unwrap().get("slug").is_some());
    }

    #[test]
    fn renders_settings() {
        let mut config = config();
        config.index.shards = 3;
        let json = IndexDefinition::new(&config, &MappingBuilder::new(&config)).to_json();
        assert_eq!(json["settings"]["number_of_shards"], json!(3));
        assert_eq!(json["settings"]["number_of_replicas"], json!(1));
        assert!(json["settings"]["analysis"]["analyzer"][NGRAM_ANALYZER].is_object());
        assert!(json["mappings"]["post"]["properties"]["post_title"].is_object());
    }

    #[test]
    fn schema_hooks_apply_per_content_type() {
        let config = config();
        let mut builder = MappingBuilder::new(&config);
        builder.schema_hook(|content_type, mut schema| {
            if content_type == "page" {
                schema.insert("template", FieldMapping::keyword());
            }
            schema
        });
        let definition = IndexDefinition::new(&config, &builder);
        assert!(definition.mapping("page").unwrap().get("template").is_some());
        assert!(definition.mapping("post").unwrap().get("template").is_none());
    }
}
