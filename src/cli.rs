//! Command-line argument parsing for the playground
//!
//! Supports:
//! - Opening a shared link (or a bare fragment token)
//! - Starting from a source file
//! - Printing a shareable link without opening a window

use std::path::PathBuf;

use clap::Parser;

use crate::codec;
use crate::config::PlaygroundConfig;

/// Live Ruby formatting playground
#[derive(Parser, Debug)]
#[command(name = "playground", version, about = "Live Ruby formatting playground")]
pub struct CliArgs {
    /// Shared playground link, or just its fragment token
    #[arg(value_name = "LINK")]
    pub link: Option<String>,

    /// Start from the contents of a source file
    #[arg(short, long, value_name = "FILE", conflicts_with = "link")]
    pub file: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print a shareable link for the starting source and exit
    #[arg(long)]
    pub print_link: bool,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Link whose fragment seeds the input, always containing a `#`
    pub link: Option<String>,
    pub config_path: Option<PathBuf>,
    pub print_link: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into startup configuration
    pub fn into_config(self) -> Result<StartupConfig, String> {
        let link = match (self.link, self.file) {
            (_, Some(path)) => {
                let source = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
                Some(format!("#{}", codec::encode(&source)))
            }
            (Some(link), None) if link.contains('#') => Some(link),
            (Some(token), None) => Some(format!("#{}", token)),
            (None, None) => None,
        };

        Ok(StartupConfig {
            link,
            config_path: self.config,
            print_link: self.print_link,
        })
    }
}

impl StartupConfig {
    /// Load the configuration file selected on the command line
    pub fn load_config(&self) -> PlaygroundConfig {
        match &self.config_path {
            Some(path) => PlaygroundConfig::load_or_default(path),
            None => PlaygroundConfig::load(),
        }
    }
}
