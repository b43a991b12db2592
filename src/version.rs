//! Build version descriptor shown in the page footer

use std::path::Path;

use serde::{Deserialize, Serialize};

/// `{ "version": "0.10.0", "commit": "…", "shortCommit": "…" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptor {
    pub version: String,
    pub commit: String,
    pub short_commit: String,
}

impl VersionDescriptor {
    pub fn parse(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid version descriptor: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            format!(
                "Failed to read version descriptor {}: {}",
                path.display(),
                e
            )
        })?;
        Self::parse(&content)
    }

    /// Footer text, e.g. `v0.10.0 (1a2b3c4)`
    pub fn label(&self) -> String {
        if self.short_commit.is_empty() {
            format!("v{}", self.version)
        } else {
            format!("v{} ({})", self.version, self.short_commit)
        }
    }
}
