//! Dashboard configuration: where the dataset lives and which page elements
//! to draw into
//!
//! Every field has a default, so an empty JSON object (or no config file at
//! all) gives the stock dashboard.

use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DATASET_URL: &str =
    "https://static.bc-edx.com/data/dl-1-2/m14/lms/starter/samples.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_url")]
    pub dataset_url: String,
    /// Read the dataset from disk instead of `dataset_url`
    #[serde(default)]
    pub dataset_file: Option<PathBuf>,
    /// Per-request timeout. None waits forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub targets: Targets,
}

/// Element ids of the embedding page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    #[serde(default = "default_selector")]
    pub selector: String,
    #[serde(default = "default_bar")]
    pub bar: String,
    #[serde(default = "default_bubble")]
    pub bubble: String,
    #[serde(default = "default_metadata")]
    pub metadata: String,
}

fn default_url() -> String { DEFAULT_DATASET_URL.to_string() }
fn default_selector() -> String { "selDataset".to_string() }
fn default_bar() -> String { "bar".to_string() }
fn default_bubble() -> String { "bubble".to_string() }
fn default_metadata() -> String { "sample-metadata".to_string() }

impl Default for Targets {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            bar: default_bar(),
            bubble: default_bubble(),
            metadata: default_metadata(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_url: default_url(),
            dataset_file: None,
            timeout_secs: None,
            targets: Targets::default(),
        }
    }
}

impl DashboardConfig {
    /// Load a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            DashError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            DashError::Config(format!("invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dataset_file.is_none() && self.dataset_url.trim().is_empty() {
            return Err(DashError::Config("dataset_url is empty".to_string()));
        }
        let t = &self.targets;
        for (name, id) in [
            ("selector", &t.selector),
            ("bar", &t.bar),
            ("bubble", &t.bubble),
            ("metadata", &t.metadata),
        ] {
            if id.trim().is_empty() {
                return Err(DashError::Config(format!("target '{}' has an empty id", name)));
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
