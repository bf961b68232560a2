//! Selected facet values.

use std::{collections::BTreeMap, slice};

use serde::{Deserialize, Serialize};

/// Values selected for one facet.
///
/// The JSON forms are `"red"`, `["red", "blue"]` and `{"or": ["red", "blue"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FacetValues {
    /// A single required value.
    One(String),
    /// Every value is required.
    All(Vec<String>),
    /// At least one value is required.
    Any {
        /// Alternatives.
        or: Vec<String>,
    },
}

impl FacetValues {
    /// Returns the selected values.
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(value) => slice::from_ref(value),
            Self::All(values) | Self::Any { or: values } => values,
        }
    }

    /// Returns true for the `or` form.
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any { .. })
    }
}

/// Selected values by facet name. A facet without an entry is not filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FacetSelection(BTreeMap<String, FacetValues>);

impl FacetSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a value, combining with earlier required values of the facet.
    pub fn require(&mut self, facet: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        let entry = self.0.entry(facet.into());
        entry
            .and_modify(|existing| {
                let mut values = existing.values().to_vec();
                values.push(value.clone());
                *existing = FacetValues::All(values);
            })
            .or_insert_with(|| FacetValues::One(value.clone()));
        self
    }

    /// Adds an alternative value, combining with earlier alternatives of the facet.
    pub fn any_of(&mut self, facet: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        let entry = self.0.entry(facet.into());
        entry
            .and_modify(|existing| {
                let mut values = existing.values().to_vec();
                values.push(value.clone());
                *existing = FacetValues::Any { or: values };
            })
            .or_insert_with(|| FacetValues::Any {
                or: vec![value.clone()],
            });
        self
    }

    /// Sets the values of a facet, replacing any earlier selection.
    pub fn set(&mut self, facet: impl Into<String>, values: FacetValues) -> &mut Self {
        self.0.insert(facet.into(), values);
        self
    }

    /// Returns the selection for a facet.
    pub fn get(&self, facet: &str) -> Option<&FacetValues> {
        self.0.get(facet)
    }

    /// Iterates over selected facets in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FacetValues)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses the JSON form.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}
