//! Sample label map

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Mapping from sample ID to a categorical label
///
/// Built from a two-column table (sample ID, label). When a sample ID
/// appears more than once, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelMap {
    labels: HashMap<String, String>,
}

impl LabelMap {
    /// Create an empty label map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (sample ID, label) pairs in table order
    pub fn from_pairs<I, S, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: Into<String>,
    {
        let mut map = Self::new();
        for (sample_id, label) in pairs {
            map.insert(sample_id, label);
        }
        map
    }

    /// Insert a label, replacing any earlier one for the same sample
    pub fn insert(&mut self, sample_id: impl Into<String>, label: impl Into<String>) {
        let sample_id = sample_id.into();
        let label = label.into();
        if let Some(previous) = self.labels.insert(sample_id.clone(), label) {
            log::debug!(
                "Label for sample '{}' redefined (previous: '{}')",
                sample_id,
                previous
            );
        }
    }

    /// Get the label for a sample
    pub fn get(&self, sample_id: &str) -> Option<&str> {
        self.labels.get(sample_id).map(|s| s.as_str())
    }

    /// Get the number of labelled samples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if no sample is labelled
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels aligned with `sample_ids`; unmapped samples are `None`
    pub fn labels_for(&self, sample_ids: &[String]) -> Vec<Option<String>> {
        sample_ids
            .iter()
            .map(|id| self.get(id).map(str::to_string))
            .collect()
    }
}
