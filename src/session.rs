//! Session bootstrap
//!
//! Chooses the initial source (shared link or built-in default) and the
//! initial theme, then builds the session model.

use crate::codec;
use crate::config::PlaygroundConfig;
use crate::model::PlaygroundModel;
use crate::prefs::PreferenceStore;
use crate::theme::{ThemePreference, THEME_PREFERENCE_KEY};

/// Source shown when the link carries no usable state
pub const DEFAULT_SOURCE: &str = "class Foo
def bar(x,y,z)
if x
y
else
z
end
end
end
";

/// The fragment of a link, without the `#`
///
/// `None` when the link has no `#` or nothing follows it.
pub fn fragment_of(link: &str) -> Option<&str> {
    link.split_once('#')
        .map(|(_, fragment)| fragment)
        .filter(|fragment| !fragment.is_empty())
}

/// The share link for a token, in the form accepted as `LINK` on the command line
pub fn share_link(token: &str) -> String {
    format!("#{}", token)
}

/// Decoded fragment text, or [`DEFAULT_SOURCE`]
pub fn initial_source(fragment: Option<&str>) -> String {
    let Some(token) = fragment else {
        return DEFAULT_SOURCE.to_string();
    };
    match codec::decode(token) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!("Ignoring undecodable fragment: {}", e);
            DEFAULT_SOURCE.to_string()
        }
    }
}

/// Stored theme preference, defaulting to dark
pub fn initial_theme(store: &dyn PreferenceStore) -> ThemePreference {
    match store.get(THEME_PREFERENCE_KEY) {
        Some(value) => value.parse().unwrap_or_else(|e| {
            tracing::warn!("{}; using {}", e, ThemePreference::default());
            ThemePreference::default()
        }),
        None => ThemePreference::default(),
    }
}

/// Build the session model for a page opened at `link`
pub fn bootstrap(
    config: PlaygroundConfig,
    store: &dyn PreferenceStore,
    link: Option<&str>,
) -> PlaygroundModel {
    let theme = initial_theme(store);
    let fragment = link.and_then(fragment_of);
    let source = initial_source(fragment);

    let mut model = PlaygroundModel::new(config, theme, &source);
    model.fragment = fragment
        .filter(|token| codec::decode(token).is_ok())
        .map(str::to_string);

    tracing::info!(
        "Session bootstrapped: theme={}, source from {}",
        theme,
        if model.fragment.is_some() { "link" } else { "default" }
    );
    model
}
