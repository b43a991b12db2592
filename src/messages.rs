//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::formatter::FormatOutcome;
use crate::scheduler::TimerTicket;
use crate::theme::ThemePreference;
use crate::version::VersionDescriptor;

/// Input surface messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMsg {
    /// The input surface content changed (full text after the edit)
    Changed(String),
}

/// Format cycle messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatMsg {
    /// A debounce timer fired
    TimerFired(TimerTicket),
    /// Cancel any pending timer and format immediately
    FlushNow,
    /// The formatter finished with `source` as its input
    Completed {
        source: String,
        outcome: FormatOutcome,
    },
}

/// Theme messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMsg {
    /// Flip between dark and light
    Toggle,
    /// Switch to a specific theme
    Set(ThemePreference),
}

/// Application lifecycle messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMsg {
    /// The page is ready; run the startup sequence
    Started,
    /// Version descriptor load completed (async result)
    VersionLoaded(Result<VersionDescriptor, String>),
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Edit(EditMsg),
    Format(FormatMsg),
    Theme(ThemeMsg),
    App(AppMsg),
}

// Convenience constructors for common messages
impl Msg {
    pub fn edit(text: impl Into<String>) -> Self {
        Msg::Edit(EditMsg::Changed(text.into()))
    }

    pub fn toggle_theme() -> Self {
        Msg::Theme(ThemeMsg::Toggle)
    }
}
