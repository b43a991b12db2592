//! Playground page and its IPC protocol
//!
//! The page posts JSON messages through `window.ipc.postMessage`:
//! `{"type":"ready"}`, `{"type":"edit","text":"…"}`, `{"type":"toggleTheme"}`
//! and `{"type":"copyLink"}`.
//! Rust calls back into `window.playground.*` (see [`super::webview`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use playground::theme::{Palette, ThemePreference};

const TEMPLATE: &str = include_str!("../../assets/playground.html");
const BOOTSTRAP_PLACEHOLDER: &str = "/*BOOTSTRAP*/null";

/// Messages posted by the page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageEvent {
    /// Scripts are loaded and `window.playground` exists
    Ready,
    /// The input surface changed
    Edit { text: String },
    /// The theme button was clicked
    ToggleTheme,
    /// The copy button next to the share link was clicked
    CopyLink,
}

impl PageEvent {
    pub fn parse(body: &str) -> Result<Self, String> {
        serde_json::from_str(body).map_err(|e| format!("Invalid page message {:?}: {}", body, e))
    }
}

/// Initial page state, embedded into the HTML before it loads
#[derive(Debug, Serialize)]
pub struct PageBootstrap<'a> {
    pub input: &'a str,
    pub theme: ThemePreference,
    pub variables: BTreeMap<&'static str, String>,
}

impl<'a> PageBootstrap<'a> {
    pub fn new(input: &'a str, theme: ThemePreference, palette: &Palette) -> Self {
        Self {
            input,
            theme,
            variables: palette.css_variables().into_iter().collect(),
        }
    }
}

/// Render the page with its bootstrap state inlined
pub fn render(bootstrap: &PageBootstrap<'_>) -> Result<String, String> {
    let json = serde_json::to_string(bootstrap)
        .map_err(|e| format!("Failed to serialize page state: {}", e))?;
    Ok(TEMPLATE.replacen(BOOTSTRAP_PLACEHOLDER, &script_safe(&json), 1))
}

/// Keep user text from closing the inline `<script>` element
pub fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
