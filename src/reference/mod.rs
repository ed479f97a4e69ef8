// API reference hierarchy model
// The scraper produces this structure; the flattener consumes it

#[cfg(test)]
mod tests;

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::{ApidexError, Result};

/// Scraped API reference, conventionally persisted as a JSON document.
///
/// Maps preserve JSON document order, so iteration order is the page's
/// section order. Positional document ids depend on this.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiReference {
    #[serde(flatten)]
    pub sections: IndexMap<String, ApiSection>,
}

/// One top-level section (module) of the reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiSection {
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub subsections: IndexMap<String, ApiEntry>,
}

/// Detail fields for a single API entry page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiEntry {
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub class_signature: String,
    #[serde(default)]
    pub example_code: String,
}

impl ApiReference {
    /// Load the reference snapshot from a JSON file.
    ///
    /// A missing or malformed file surfaces as `DataUnavailable`; callers
    /// treat that as an empty reference rather than a fatal failure.
    #[inline]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ApidexError::DataUnavailable(format!(
                "Failed to read API reference at {}: {}",
                path.display(),
                e
            ))
        })?;

        let reference: Self = serde_json::from_str(&content).map_err(|e| {
            ApidexError::DataUnavailable(format!(
                "Failed to decode API reference at {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(
            "Loaded API reference with {} sections from {}",
            reference.sections.len(),
            path.display()
        );
        Ok(reference)
    }

    /// Write the reference snapshot as pretty-printed JSON.
    #[inline]
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize API reference")?;
        fs::write(path, content)?;

        debug!("Saved API reference to {}", path.display());
        Ok(())
    }

    /// Total number of entries across all sections.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.sections.values().map(|s| s.subsections.len()).sum()
    }
}
