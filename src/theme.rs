//! Theme preference and palettes
//!
//! The playground has two themes. The preference is persisted under
//! [`THEME_PREFERENCE_KEY`] as `"dark"` or `"light"`.
//!
//! Palette loading priority:
//! 1. User config: `~/.config/rubyfmt-playground/themes/{dark,light}.yaml`
//! 2. Embedded: built-in palettes compiled into the binary

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Embed palette YAML files at compile time
pub const DARK_YAML: &str = include_str!("../themes/dark.yaml");
pub const LIGHT_YAML: &str = include_str!("../themes/light.yaml");

/// Storage key of the theme preference
pub const THEME_PREFERENCE_KEY: &str = "theme";

/// The two-valued theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }

    /// Value written to storage and to the page's `data-theme` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }

    fn builtin_yaml(self) -> &'static str {
        match self {
            ThemePreference::Dark => DARK_YAML,
            ThemePreference::Light => LIGHT_YAML,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(ThemePreference::Dark),
            "light" => Ok(ThemePreference::Light),
            other => Err(format!("Unknown theme preference: {:?}", other)),
        }
    }
}

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (alpha defaults to 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse from "#RRGGBB" or "#RRGGBBAA" hex string
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        if !s.is_ascii() {
            return Err(format!("Invalid color format: {}", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&s[range], 16).map_err(|e| e.to_string())
        };
        match s.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Color {
                r: channel(0..2)?,
                g: channel(2..4)?,
                b: channel(4..6)?,
                a: channel(6..8)?,
            }),
            _ => Err(format!("Invalid color format: {}", s)),
        }
    }

    /// CSS notation used by the editor page
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }
}

/// Raw palette data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteData {
    pub version: u32,
    pub name: String,
    pub ui: UiPaletteData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiPaletteData {
    pub page: PagePaletteData,
    pub editor: EditorPaletteData,
    pub error: ErrorPaletteData,
    pub accent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagePaletteData {
    pub background: String,
    pub foreground: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorPaletteData {
    pub background: String,
    pub foreground: String,
    pub gutter: String,
    pub border: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorPaletteData {
    pub background: String,
    pub foreground: String,
}

/// Resolved palette with parsed colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub name: String,
    pub page_background: Color,
    pub page_foreground: Color,
    pub editor_background: Color,
    pub editor_foreground: Color,
    pub gutter: Color,
    pub border: Color,
    pub error_background: Color,
    pub error_foreground: Color,
    pub accent: Color,
}

impl Palette {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let data: PaletteData =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse palette: {}", e))?;
        Self::from_data(data)
    }

    fn from_data(data: PaletteData) -> Result<Self, String> {
        let ui = data.ui;
        Ok(Palette {
            name: data.name,
            page_background: Color::from_hex(&ui.page.background)?,
            page_foreground: Color::from_hex(&ui.page.foreground)?,
            editor_background: Color::from_hex(&ui.editor.background)?,
            editor_foreground: Color::from_hex(&ui.editor.foreground)?,
            gutter: Color::from_hex(&ui.editor.gutter)?,
            border: Color::from_hex(&ui.editor.border)?,
            error_background: Color::from_hex(&ui.error.background)?,
            error_foreground: Color::from_hex(&ui.error.foreground)?,
            accent: Color::from_hex(&ui.accent)?,
        })
    }

    /// Built-in palette for a preference
    pub fn builtin(theme: ThemePreference) -> Result<Self, String> {
        Self::from_yaml(theme.builtin_yaml())
    }

    /// CSS custom properties consumed by the page's style rules
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--page-bg", self.page_background.to_css()),
            ("--page-fg", self.page_foreground.to_css()),
            ("--editor-bg", self.editor_background.to_css()),
            ("--editor-fg", self.editor_foreground.to_css()),
            ("--gutter", self.gutter.to_css()),
            ("--border", self.border.to_css()),
            ("--error-bg", self.error_background.to_css()),
            ("--error-fg", self.error_foreground.to_css()),
            ("--accent", self.accent.to_css()),
        ]
    }
}

/// Load a palette from a YAML file
pub fn from_file(path: &Path) -> Result<Palette, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read palette file {}: {}", path.display(), e))?;
    Palette::from_yaml(&content)
}

/// Load the palette for `theme` with priority: user → builtin
pub fn load_palette(theme: ThemePreference) -> Result<Palette, String> {
    if let Some(user_dir) = crate::config_paths::themes_dir() {
        let user_path = user_dir.join(format!("{}.yaml", theme.as_str()));
        if user_path.exists() {
            tracing::info!("Loading user palette from {}", user_path.display());
            match from_file(&user_path) {
                Ok(palette) => return Ok(palette),
                Err(e) => tracing::warn!("{}; falling back to builtin", e),
            }
        }
    }

    Palette::builtin(theme)
}
