//! Output and error surfaces
//!
//! A completed cycle shows either the formatted text or an error, never
//! both, and only a success is written back to the link.

use crate::codec;
use crate::commands::Cmd;
use crate::formatter::FormatOutcome;
use crate::model::PlaygroundModel;

/// Apply the outcome of formatting `source`
pub fn apply_outcome(model: &mut PlaygroundModel, source: &str, outcome: FormatOutcome) -> Cmd {
    model.cycles += 1;

    match outcome {
        Ok(formatted) => {
            model.output.replace_all(&formatted);
            model.error = None;

            let token = codec::encode(source);
            model.fragment = Some(token.clone());

            tracing::debug!(
                "Format cycle {} succeeded ({} bytes out)",
                model.cycles,
                formatted.len()
            );
            Cmd::batch(vec![
                Cmd::SetOutput(formatted),
                Cmd::HideError,
                Cmd::ReplaceFragment(token),
            ])
        }
        Err(error) => {
            let message = error.message().to_string();
            tracing::debug!("Format cycle {} failed: {}", model.cycles, message);
            model.error = Some(message.clone());
            Cmd::ShowError(message)
        }
    }
}
