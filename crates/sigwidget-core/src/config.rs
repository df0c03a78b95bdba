//! Configuration for the text carried by signature widgets
//!
//! Loaded from TOML. Every key is optional and falls back to the defaults
//! used for PDF/UA-friendly invisible signatures.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Text emitted into signature widget annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Prefix of the field title; the running signature number is appended
    pub title_prefix: String,
    /// `/TU` tooltip for invisible widgets
    pub tooltip: String,
    /// `/Alt` description for invisible widgets
    pub alt_text: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            title_prefix: "Signature ".to_string(),
            tooltip: "Digital signature field (non-interactive)".to_string(),
            alt_text: "This is a digital signature ensuring document integrity and authenticity"
                .to_string(),
        }
    }
}

impl FieldConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    /// Title for the field following `existing` earlier signatures
    pub fn title(&self, existing: usize) -> String {
        format!("{}{}", self.title_prefix, existing + 1)
    }
}
