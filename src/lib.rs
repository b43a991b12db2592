//! Ruby formatting playground
//!
//! The core of an edit-format-display loop implementing the Elm Architecture
//! pattern: edits are debounced into format cycles, each outcome is shown as
//! output or as an error, and successful sources are written back to the
//! shareable link.

pub mod cli;
pub mod codec;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod formatter;
pub mod messages;
pub mod model;
pub mod prefs;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod surface;
pub mod theme;
pub mod tracing;
pub mod update;
pub mod version;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::PlaygroundConfig;
pub use messages::Msg;
pub use model::PlaygroundModel;
pub use runtime::{Host, Runtime};
