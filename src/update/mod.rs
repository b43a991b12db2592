//! Update functions for the Elm-style architecture
//!
//! All state transformations flow through these functions.

mod app;
mod display;
mod format;
mod theme;

use crate::commands::Cmd;
use crate::messages::{AppMsg, EditMsg, FormatMsg, Msg, ThemeMsg};
use crate::model::PlaygroundModel;

pub use app::update_app;
pub use display::apply_outcome;
pub use format::{flush_now, update_edit, update_format};
pub use theme::{set_theme, update_theme};

/// Main update function - dispatches to sub-handlers
pub fn update(model: &mut PlaygroundModel, msg: Msg) -> Option<Cmd> {
    let _span = tracing::debug_span!("update", msg = %msg_name(&msg)).entered();

    match msg {
        Msg::Edit(m) => format::update_edit(model, m),
        Msg::Format(m) => format::update_format(model, m),
        Msg::Theme(m) => theme::update_theme(model, m),
        Msg::App(m) => app::update_app(model, m),
    }
}

/// Short name for logging; never includes buffer contents
fn msg_name(msg: &Msg) -> String {
    match msg {
        Msg::Edit(EditMsg::Changed(text)) => format!("Edit::Changed({} bytes)", text.len()),
        Msg::Format(FormatMsg::TimerFired(ticket)) => format!("Format::TimerFired({})", ticket.0),
        Msg::Format(FormatMsg::FlushNow) => "Format::FlushNow".to_string(),
        Msg::Format(FormatMsg::Completed { outcome, .. }) => format!(
            "Format::Completed({})",
            if outcome.is_ok() { "ok" } else { "err" }
        ),
        Msg::Theme(ThemeMsg::Toggle) => "Theme::Toggle".to_string(),
        Msg::Theme(ThemeMsg::Set(theme)) => format!("Theme::Set({})", theme),
        Msg::App(AppMsg::Started) => "App::Started".to_string(),
        Msg::App(AppMsg::VersionLoaded(result)) => format!(
            "App::VersionLoaded({})",
            if result.is_ok() { "ok" } else { "err" }
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_name_hides_source() {
        let name = msg_name(&Msg::edit("secret = 1"));
        assert_eq!(name, "Edit::Changed(10 bytes)");
    }
}
