//! Fingerprint of an index definition.
//!
//! Mappings cannot be changed in place: when the fingerprint of the configured
//! definition differs from the one recorded at index creation, the index has to be
//! rebuilt. The fingerprint covers:
//! - the schema version (internal, bumped when document layout changes)
//! - shard and replica counts
//! - the analysis chain
//! - every mapping type and field

use std::hash::Hasher;

use siphasher::sip::SipHasher24;

use crate::definition::IndexDefinition;

/// Current schema version. Bump this when the document layout changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Computes the fingerprint of a definition as a 16-digit hex string.
pub fn fingerprint(definition: &IndexDefinition) -> String {
    let mut hasher = SipHasher24::new();
    hasher.write_u32(SCHEMA_VERSION);
    hasher.write(definition.to_json().to_string().as_bytes());
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod test {
    use sift_config::Config;

    use super::*;
    use crate::mapping::MappingBuilder;

    fn fingerprint_of(config: &Config) -> String {
        fingerprint(&IndexDefinition::new(config, &MappingBuilder::new(config)))
    }

    #[test]
    fn same_config_produces_same_fingerprint() {
        let config1 = Config::default();
        let config2 = Config::default();
        assert_eq!(fingerprint_of(&config1), fingerprint_of(&config2));
    }

    #[test]
    fn fingerprint_is_hex() {
        let hash = fingerprint_of(&Config::default());
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn mapping_changes_change_fingerprint() {
        let base = Config::default();
        let mut numeric = base.clone();
        numeric.fields.fields.push("price".into());
        let mut float = numeric.clone();
        float.fields.numeric.insert("price".into(), true);

        assert_ne!(fingerprint_of(&base), fingerprint_of(&numeric));
        assert_ne!(fingerprint_of(&numeric), fingerprint_of(&float));
    }

    #[test]
    fn query_settings_do_not_change_fingerprint() {
        let base = Config::default();
        let mut other = base.clone();
        other.search.page_size = 50;
        other.search.fuzziness = "2".into();
        assert_eq!(fingerprint_of(&base), fingerprint_of(&other));
    }

    #[test]
    fn shard_count_changes_fingerprint() {
        let base = Config::default();
        let mut other = base.clone();
        other.index.shards = 1;
        assert_ne!(fingerprint_of(&base), fingerprint_of(&other));
    }
}
