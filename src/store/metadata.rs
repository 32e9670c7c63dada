//! Metadata document types

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the metadata document inside the store's base directory.
pub const METADATA_FILE: &str = "metadata.json";

/// Bookkeeping entry for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMeta {
    /// When the submission was last stored
    pub indexed_at: DateTime<Utc>,
    /// Further descriptive fields carried by the document; preserved
    /// verbatim across load/save round trips
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SubmissionMeta {
    /// Entry stamped with the current time.
    pub fn now() -> Self {
        Self::indexed_at(Utc::now())
    }

    /// Entry with an explicit indexing time.
    pub fn indexed_at(timestamp: DateTime<Utc>) -> Self {
        Self {
            indexed_at: timestamp,
            extra: serde_json::Map::new(),
        }
    }
}

/// The single JSON document mapping submission id to its entry.
///
/// `BTreeMap` keeps the on-disk ordering stable across rewrites.
pub type MetadataDocument = BTreeMap<String, SubmissionMeta>;
