//! Configuration paths for the playground
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/rubyfmt-playground/`
//! - Windows: `%APPDATA%\rubyfmt-playground\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "rubyfmt-playground";

/// Prefix of the rolling log files written by [`crate::tracing::init`]
pub const LOG_FILE_PREFIX: &str = "playground.log";

/// Base config directory
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/rubyfmt-playground`
///   - Else: `~/.config/rubyfmt-playground`
///
/// Windows:
///   - `%APPDATA%\rubyfmt-playground`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/rubyfmt-playground/themes/`
pub fn themes_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("themes"))
}

/// `~/.config/rubyfmt-playground/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/rubyfmt-playground/preferences.yaml`
pub fn preferences_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("preferences.yaml"))
}

/// `~/.config/rubyfmt-playground/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

pub fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}
