//! Theme switching
//!
//! Surfaces take their theme at construction, so a change rebuilds both of
//! them. The debounce state is left alone.

use crate::commands::Cmd;
use crate::messages::ThemeMsg;
use crate::model::PlaygroundModel;
use crate::surface::{rebuild_preserving_text, EditorSurface, TextSurface};
use crate::theme::{ThemePreference, THEME_PREFERENCE_KEY};

/// Handle theme messages
pub fn update_theme(model: &mut PlaygroundModel, msg: ThemeMsg) -> Option<Cmd> {
    let theme = match msg {
        ThemeMsg::Toggle => model.theme.toggled(),
        ThemeMsg::Set(theme) => theme,
    };
    Some(set_theme(model, theme))
}

/// Switch to `theme`: persist it, restyle the page, rebuild both surfaces
pub fn set_theme(model: &mut PlaygroundModel, theme: ThemePreference) -> Cmd {
    tracing::info!("Theme {} -> {}", model.theme, theme);
    model.theme = theme;

    rebuild_slot(&mut model.input, theme);
    rebuild_slot(&mut model.output, theme);

    Cmd::batch(vec![
        Cmd::SavePreference {
            key: THEME_PREFERENCE_KEY,
            value: theme.as_str().to_string(),
        },
        Cmd::ApplyTheme(theme),
        Cmd::RebuildSurfaces {
            theme,
            input: model.source(),
            output: model.output_text(),
        },
    ])
}

fn rebuild_slot(slot: &mut Box<dyn EditorSurface>, theme: ThemePreference) {
    let config = slot.config().with_theme(theme);
    let old = std::mem::replace(slot, TextSurface::new(config).boxed());
    *slot = rebuild_preserving_text(old, config);
}
