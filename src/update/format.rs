//! Format cycle scheduling
//!
//! Edits arm a debounce ticket; only the newest ticket may start a format.

use crate::commands::Cmd;
use crate::messages::{EditMsg, FormatMsg};
use crate::model::PlaygroundModel;

use super::display;

/// Handle input surface edits
pub fn update_edit(model: &mut PlaygroundModel, msg: EditMsg) -> Option<Cmd> {
    match msg {
        EditMsg::Changed(text) => {
            // No equality check: an edit that leaves the text unchanged still
            // restarts the quiet period.
            model.input.replace_all(&text);
            model.revision += 1;

            let ticket = model.scheduler.arm();
            tracing::trace!(
                "edit rev={} armed ticket {}",
                model.revision,
                ticket.0
            );
            Some(Cmd::StartDebounce {
                ticket,
                delay: model.scheduler.quiet_period(),
            })
        }
    }
}

/// Handle format cycle messages
pub fn update_format(model: &mut PlaygroundModel, msg: FormatMsg) -> Option<Cmd> {
    match msg {
        FormatMsg::TimerFired(ticket) => {
            if !model.scheduler.take_if_current(ticket) {
                tracing::debug!("Ignoring stale debounce ticket {}", ticket.0);
                return None;
            }
            Some(run_format(model))
        }

        FormatMsg::FlushNow => Some(flush_now(model)),

        FormatMsg::Completed { source, outcome } => {
            Some(display::apply_outcome(model, &source, outcome))
        }
    }
}

/// Cancel any pending debounce and format the current input immediately
pub fn flush_now(model: &mut PlaygroundModel) -> Cmd {
    if let Some(ticket) = model.scheduler.cancel() {
        tracing::debug!("Flush cancelled pending ticket {}", ticket.0);
    }
    run_format(model)
}

fn run_format(model: &PlaygroundModel) -> Cmd {
    let source = model.source();
    tracing::debug!(
        "Starting format cycle {} ({} bytes, rev {})",
        model.cycles + 1,
        source.len(),
        model.revision
    );
    Cmd::RunFormat { source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaygroundConfig;
    use crate::scheduler::TimerTicket;
    use crate::theme::ThemePreference;
    use std::time::Duration;

    fn model() -> PlaygroundModel {
        PlaygroundModel::new(PlaygroundConfig::default(), ThemePreference::Dark, "x")
    }

    fn armed_ticket(cmd: Option<Cmd>) -> TimerTicket {
        match cmd {
            Some(Cmd::StartDebounce { ticket, delay }) => {
                assert_eq!(delay, Duration::from_millis(200));
                ticket
            }
            other => panic!("Expected StartDebounce, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_stores_text_and_arms_timer() {
        let mut model = model();
        let ticket = armed_ticket(update_edit(&mut model, EditMsg::Changed("y = 2".into())));
        assert_eq!(model.source(), "y = 2");
        assert_eq!(model.revision, 1);
        assert_eq!(model.scheduler.pending(), Some(ticket));
    }

    #[test]
    fn test_configured_quiet_period() {
        let config = PlaygroundConfig {
            debounce_ms: 50,
            ..PlaygroundConfig::default()
        };
        let mut model = PlaygroundModel::new(config, ThemePreference::Dark, "");
        let cmd = update_edit(&mut model, EditMsg::Changed("a".into()));
        assert!(matches!(
            cmd,
            Some(Cmd::StartDebounce { delay, .. }) if delay == Duration::from_millis(50)
        ));
    }

    #[test]
    fn test_timer_fire_formats_current_text() {
        let mut model = model();
        let ticket = armed_ticket(update_edit(&mut model, EditMsg::Changed("a".into())));
        model.input.replace_all("ab");

        let cmd = update_format(&mut model, FormatMsg::TimerFired(ticket));
        assert_eq!(cmd, Some(Cmd::RunFormat { source: "ab".into() }));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut model = model();
        let first = armed_ticket(update_edit(&mut model, EditMsg::Changed("a".into())));
        let second = armed_ticket(update_edit(&mut model, EditMsg::Changed("ab".into())));

        assert_eq!(update_format(&mut model, FormatMsg::TimerFired(first)), None);
        assert!(update_format(&mut model, FormatMsg::TimerFired(second)).is_some());
        // A ticket fires at most once
        assert_eq!(update_format(&mut model, FormatMsg::TimerFired(second)), None);
    }

    #[test]
    fn test_flush_cancels_pending_ticket() {
        let mut model = model();
        let ticket = armed_ticket(update_edit(&mut model, EditMsg::Changed("a".into())));

        let cmd = update_format(&mut model, FormatMsg::FlushNow);
        assert_eq!(cmd, Some(Cmd::RunFormat { source: "a".into() }));
        assert_eq!(update_format(&mut model, FormatMsg::TimerFired(ticket)), None);
    }
}
