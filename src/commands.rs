//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::path::PathBuf;
use std::time::Duration;

use crate::scheduler::TimerTicket;
use crate::theme::ThemePreference;
use crate::version::VersionDescriptor;

/// Commands returned by update functions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Execute multiple commands in order
    Batch(Vec<Cmd>),

    // === Format Cycle ===
    /// (Re)start the debounce timer
    /// After `delay`, sends Msg::Format(TimerFired(ticket))
    StartDebounce { ticket: TimerTicket, delay: Duration },
    /// Run the formatter on a snapshot of the input
    /// Sends Msg::Format(Completed) before any other message is handled
    RunFormat { source: String },

    // === Display ===
    /// Replace the output surface content
    SetOutput(String),
    /// Show the error surface with a message
    ShowError(String),
    /// Hide the error surface
    HideError,
    /// Replace the URL fragment without adding a history entry
    ReplaceFragment(String),

    // === Theme ===
    /// Write a preference synchronously
    SavePreference { key: &'static str, value: String },
    /// Set the page-level theme attribute and palette
    ApplyTheme(ThemePreference),
    /// Rebuild both editor surfaces with the theme, restoring their text
    RebuildSurfaces {
        theme: ThemePreference,
        input: String,
        output: String,
    },

    // === Version ===
    /// Load the version descriptor in the background
    /// Sends Msg::App(VersionLoaded) when done
    LoadVersion { path: PathBuf },
    /// Show the version descriptor in the footer
    ShowVersion(VersionDescriptor),
}

impl Cmd {
    /// Create a batch of commands, collapsing trivial cases
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut cmds: Vec<Cmd> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.remove(0),
            _ => Cmd::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Flatten nested batches into execution order
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => vec![],
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            cmd => vec![cmd],
        }
    }
}

impl From<Option<Cmd>> for Cmd {
    fn from(cmd: Option<Cmd>) -> Self {
        cmd.unwrap_or_default()
    }
}
