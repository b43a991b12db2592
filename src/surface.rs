//! Editor surfaces
//!
//! The core only relies on the capability set in [`EditorSurface`]. The desktop
//! shell mirrors these surfaces into the webview; tests use [`TextSurface`]
//! directly. Change notifications do not go through the surface: the widget
//! reports edits as `Msg::Edit`.

use std::fmt;

use ropey::Rope;

use crate::theme::ThemePreference;

/// Which pane a surface renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    /// Editable source buffer
    Input,
    /// Read-only formatted result
    Output,
}

/// Construction-time configuration of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub role: SurfaceRole,
    pub theme: ThemePreference,
    pub editable: bool,
}

impl SurfaceConfig {
    pub fn input(theme: ThemePreference) -> Self {
        Self {
            role: SurfaceRole::Input,
            theme,
            editable: true,
        }
    }

    pub fn output(theme: ThemePreference) -> Self {
        Self {
            role: SurfaceRole::Output,
            theme,
            editable: false,
        }
    }

    /// Same role and editability, different theme
    pub fn with_theme(self, theme: ThemePreference) -> Self {
        Self { theme, ..self }
    }
}

/// Capability set of an editor widget
pub trait EditorSurface: fmt::Debug {
    /// Current document content
    fn text(&self) -> String;

    /// Replace the whole document
    fn replace_all(&mut self, text: &str);

    fn config(&self) -> &SurfaceConfig;

    /// Construct a fresh, empty instance with a new configuration
    fn rebuild(&self, config: SurfaceConfig) -> Box<dyn EditorSurface>;

    /// Tear the instance down
    fn destroy(self: Box<Self>);
}

/// Rebuild a surface with a new configuration, keeping its text exactly
///
/// The sequence is snapshot, construct, destroy, restore. There is no
/// incremental restyling path.
pub fn rebuild_preserving_text(
    surface: Box<dyn EditorSurface>,
    config: SurfaceConfig,
) -> Box<dyn EditorSurface> {
    let snapshot = surface.text();
    let mut fresh = surface.rebuild(config);
    surface.destroy();
    fresh.replace_all(&snapshot);
    fresh
}

/// Rope-backed in-memory surface
#[derive(Debug, Clone)]
pub struct TextSurface {
    buffer: Rope,
    config: SurfaceConfig,
    /// How many times this surface has been rebuilt
    generation: u64,
}

impl TextSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            buffer: Rope::new(),
            config,
            generation: 0,
        }
    }

    pub fn with_text(config: SurfaceConfig, text: &str) -> Self {
        Self {
            buffer: Rope::from_str(text),
            config,
            generation: 0,
        }
    }

    pub fn boxed(self) -> Box<dyn EditorSurface> {
        Box::new(self)
    }
}

impl EditorSurface for TextSurface {
    fn text(&self) -> String {
        self.buffer.to_string()
    }

    fn replace_all(&mut self, text: &str) {
        self.buffer = Rope::from_str(text);
    }

    fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    fn rebuild(&self, config: SurfaceConfig) -> Box<dyn EditorSurface> {
        Box::new(TextSurface {
            buffer: Rope::new(),
            config,
            generation: self.generation + 1,
        })
    }

    fn destroy(self: Box<Self>) {
        tracing::trace!(
            "destroying {:?} surface (generation {})",
            self.config.role,
            self.generation
        );
    }
}
