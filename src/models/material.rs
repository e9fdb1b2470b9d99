use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Free-form string tags attached to a material, e.g. `subject`.
pub type Metadata = BTreeMap<String, String>;

/// A stored piece of study text.
///
/// Materials are append-only: the `id` is assigned once (count of earlier
/// materials + 1) and the record is never edited afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Material {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// A material matched by keyword search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHit {
    pub text: String,
    pub metadata: Metadata,
    /// Number of query tokens found in the text.
    pub score: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterialStats {
    pub document_count: usize,
    pub storage_path: PathBuf,
}

/// Convenience for the common single-tag case.
pub fn subject_metadata(subject: impl Into<String>) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("subject".to_string(), subject.into());
    metadata
}
