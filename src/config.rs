//! Extractor configuration
//!
//! Every field has a default, so a partial JSON document is a valid config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::extractors::base::ContextConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// How `code_context` is rendered when enabled
    pub context: ContextConfig,
    pub include_code_context: bool,
    pub compute_complexity: bool,
    /// Emit `field` / `enum_member` children for aggregates and enums
    pub include_fields: bool,
    /// Brace blocks nested deeper than this are not scanned for declarations
    pub max_nesting_depth: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            context: ContextConfig::default(),
            include_code_context: false,
            compute_complexity: true,
            include_fields: true,
            max_nesting_depth: 256,
        }
    }
}

impl ExtractorConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid extractor configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }
}
