//! Versioned JSON export of an index generation.

use super::{IndexEntry, IndexGeneration, IndexStats};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Format version written to and required from index exports.
pub const EXPORT_VERSION: &str = "1.0";

/// Portable JSON form of an index generation.
///
/// ```json
/// { "version": "1.0", "generatedAt": "...", "entries": [...], "stats": {...} }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexExport {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<IndexEntry>,
    pub stats: IndexStats,
}

impl IndexExport {
    pub fn from_generation(index: &IndexGeneration) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            generated_at: index.generated_at,
            entries: index.entries.iter().map(|e| IndexEntry::clone(e)).collect(),
            stats: index.stats.clone(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an export, rejecting other format versions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] for invalid JSON or a version other
    /// than [`EXPORT_VERSION`].
    pub fn from_json(json: &str) -> Result<Self> {
        let export: Self = serde_json::from_str(json)?;
        if export.version != EXPORT_VERSION {
            return Err(Error::Serialization(format!(
                "unsupported index export version {} (expected {EXPORT_VERSION})",
                export.version
            )));
        }
        Ok(export)
    }

    /// Rehydrate into a generation with the given number.
    pub fn into_generation(self, generation: u64) -> IndexGeneration {
        IndexGeneration {
            generation,
            entries: self.entries.into_iter().map(Arc::new).collect(),
            stats: self.stats,
            generated_at: self.generated_at,
        }
    }
}
