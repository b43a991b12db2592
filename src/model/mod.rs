//! Session model - the complete state of one playground session
//!
//! One explicit context object owns everything the update functions touch.

use crate::config::PlaygroundConfig;
use crate::scheduler::Debouncer;
use crate::surface::{EditorSurface, SurfaceConfig, TextSurface};
use crate::theme::ThemePreference;
use crate::version::VersionDescriptor;

/// The complete session model
#[derive(Debug)]
pub struct PlaygroundModel {
    /// Editable source buffer
    pub input: Box<dyn EditorSurface>,
    /// Last successful format result
    pub output: Box<dyn EditorSurface>,
    /// Error surface: `Some(message)` while shown
    pub error: Option<String>,
    pub theme: ThemePreference,
    /// Current URL fragment token (without the `#`)
    pub fragment: Option<String>,
    /// Live debounce ticket
    pub scheduler: Debouncer,
    /// Bumped on every edit
    pub revision: u64,
    /// Number of completed format cycles
    pub cycles: u64,
    pub version: Option<VersionDescriptor>,
    pub config: PlaygroundConfig,
}

impl PlaygroundModel {
    /// A model with in-memory surfaces holding `source`
    pub fn new(config: PlaygroundConfig, theme: ThemePreference, source: &str) -> Self {
        Self {
            input: TextSurface::with_text(SurfaceConfig::input(theme), source).boxed(),
            output: TextSurface::new(SurfaceConfig::output(theme)).boxed(),
            error: None,
            theme,
            fragment: None,
            scheduler: Debouncer::new(config.quiet_period()),
            revision: 0,
            cycles: 0,
            version: None,
            config,
        }
    }

    pub fn source(&self) -> String {
        self.input.text()
    }

    pub fn output_text(&self) -> String {
        self.output.text()
    }
}
