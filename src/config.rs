//! Playground configuration
//!
//! Stored in `~/.config/rubyfmt-playground/config.yaml`:
//!
//! ```yaml
//! debounce_ms: 200
//! engine:
//!   kind: command
//!   program: /usr/local/bin/rubyfmt
//!   args: []
//!   timeout_ms: 5000
//! version_file: /usr/share/rubyfmt-playground/version.json
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scheduler::DEFAULT_QUIET_PERIOD;

/// Which formatting engine to run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EngineConfig {
    /// The built-in block re-indenter
    #[default]
    Builtin,
    /// An external program reading stdin and writing stdout
    Command {
        program: PathBuf,
        #[serde(default)]
        args: Vec<String>,
        /// Kill the program if it runs longer than this, in milliseconds
        #[serde(default = "default_timeout_ms")]
        timeout_ms: u64,
    },
}

fn default_timeout_ms() -> u64 {
    crate::formatter::DEFAULT_COMMAND_TIMEOUT.as_millis() as u64
}

/// Configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    /// Quiet period before formatting, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub engine: EngineConfig,

    /// JSON version descriptor shown in the footer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_file: Option<PathBuf>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_QUIET_PERIOD.as_millis() as u64
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            engine: EngineConfig::default(),
            version_file: None,
        }
    }
}

impl PlaygroundConfig {
    /// Load config from the default location, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_or_default(&path)
    }

    /// Load config from `path`, logging and falling back to defaults on error
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlaygroundConfig::default();
        assert_eq!(config.quiet_period(), Duration::from_millis(200));
        assert_eq!(config.engine, EngineConfig::Builtin);
        assert!(config.version_file.is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: PlaygroundConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, PlaygroundConfig::default());
    }

    #[test]
    fn test_command_engine_yaml() {
        let yaml = "engine:\n  kind: command\n  program: /usr/local/bin/rubyfmt\n";
        let config: PlaygroundConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.engine,
            EngineConfig::Command {
                program: PathBuf::from("/usr/local/bin/rubyfmt"),
                args: vec![],
                timeout_ms: 5000,
            }
        );
    }

    #[test]
    fn test_command_engine_timeout() {
        let yaml = "engine:\n  kind: command\n  program: rubyfmt\n  timeout_ms: 750\n";
        let config: PlaygroundConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            config.engine,
            EngineConfig::Command { timeout_ms: 750, .. }
        ));
    }

    #[test]
    fn test_unknown_engine_kind_is_error() {
        let yaml = "engine:\n  kind: wasm\n";
        assert!(serde_yaml::from_str::<PlaygroundConfig>(yaml).is_err());
    }
}
