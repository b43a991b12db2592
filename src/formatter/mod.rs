//! Formatter adapters
//!
//! Every engine sits behind [`Formatter`], which turns source text into a
//! [`FormatOutcome`]. Engines may fail for any reason (syntax error, internal
//! fault, resource exhaustion); all of those collapse into one [`FormatError`].
//!
//! ## Engines
//!
//! - [`FfiFormatter`] - an engine exposing `format(char*) -> char*` / `free_string(char*)`
//!   and optionally `last_error()`
//! - [`CommandFormatter`] - an external binary reading stdin, writing stdout
//! - [`reindent`] - the built-in block re-indenter, reached through the C ABI

mod command;
mod ffi;
pub mod reindent;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

pub use command::{CommandFormatter, DEFAULT_COMMAND_TIMEOUT};
pub use ffi::{EngineAbi, FfiFormatter, FormatFn, FreeFn, LastErrorFn};

use crate::config::EngineConfig;

/// Message shown when an engine fails without saying why
pub const DEFAULT_FAILURE_MESSAGE: &str = "Formatting failed";

/// The single failure kind of the formatting pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    message: Option<String>,
}

impl FormatError {
    /// A failure carrying an explanation from the engine
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A failure the engine signalled without any explanation
    pub fn unexplained() -> Self {
        Self { message: None }
    }

    /// User-visible message, falling back to [`DEFAULT_FAILURE_MESSAGE`]
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_FAILURE_MESSAGE)
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for FormatError {}

/// Result of one completed format cycle
pub type FormatOutcome = Result<String, FormatError>;

/// A formatting engine behind a synchronous contract
pub trait Formatter {
    /// Short engine name for logs
    fn name(&self) -> &str;

    /// Format `source`, surfacing every engine failure as [`FormatError`]
    fn format(&self, source: &str) -> FormatOutcome;
}

/// Run a formatter, converting a panic inside the engine into a failure
pub fn run_guarded(formatter: &dyn Formatter, source: &str) -> FormatOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| formatter.format(source))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned());
            tracing::error!(
                "Formatter '{}' panicked: {}",
                formatter.name(),
                detail.as_deref().unwrap_or("<no message>")
            );
            Err(FormatError::unexplained())
        }
    }
}

/// Build the formatter selected by configuration
pub fn from_config(engine: &EngineConfig) -> Box<dyn Formatter> {
    match engine {
        EngineConfig::Builtin => Box::new(FfiFormatter::new("builtin", reindent::ABI)),
        EngineConfig::Command {
            program,
            args,
            timeout_ms,
        } => Box::new(
            CommandFormatter::new(program.clone(), args.clone())
                .with_timeout(Duration::from_millis(*timeout_ms)),
        ),
    }
}
