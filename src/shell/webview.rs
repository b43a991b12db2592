//! Webview host
//!
//! Implements the runtime's display side by calling `window.playground.*`
//! in the page. Calls made before the page reports ready are queued.

use serde_json::{json, Value};
use wry::WebView;

use playground::runtime::Host;
use playground::session;
use playground::theme::{self, Palette, ThemePreference};
use playground::version::VersionDescriptor;

#[derive(Default)]
pub struct WebviewHost {
    webview: Option<WebView>,
    ready: bool,
    queued: Vec<String>,
    /// Last fragment written to the page
    fragment: Option<String>,
}

impl WebviewHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, webview: WebView) {
        self.webview = Some(webview);
        self.ready = false;
    }

    pub fn webview(&self) -> Option<&WebView> {
        self.webview.as_ref()
    }

    /// The page finished loading; flush queued calls
    pub fn mark_ready(&mut self) {
        self.ready = true;
        for script in std::mem::take(&mut self.queued) {
            self.evaluate(&script);
        }
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Share link for the last successfully formatted source
    pub fn share_link(&self) -> Option<String> {
        self.fragment().map(session::share_link)
    }

    /// Tell the page whether its copy request went through
    pub fn link_copied(&mut self, ok: bool) {
        self.call("linkCopied", &[json!(ok)]);
    }

    fn call(&mut self, function: &str, args: &[Value]) {
        let args: Vec<String> = args.iter().map(Value::to_string).collect();
        let script = format!("window.playground.{}({});", function, args.join(", "));
        if self.ready {
            self.evaluate(&script);
        } else {
            self.queued.push(script);
        }
    }

    fn evaluate(&self, script: &str) {
        let Some(webview) = &self.webview else {
            tracing::warn!("No webview to run script on");
            return;
        };
        if let Err(e) = webview.evaluate_script(script) {
            tracing::error!("Failed to evaluate script: {}", e);
        }
    }
}

/// Palette for `theme`, falling back to the built-in one
pub fn palette_for(theme: ThemePreference) -> Option<Palette> {
    theme::load_palette(theme)
        .or_else(|e| {
            tracing::warn!("{}", e);
            Palette::builtin(theme)
        })
        .map_err(|e| tracing::error!("Built-in palette is invalid: {}", e))
        .ok()
}

impl Host for WebviewHost {
    fn set_output(&mut self, text: &str) {
        self.call("setOutput", &[json!(text)]);
    }

    fn show_error(&mut self, message: &str) {
        self.call("showError", &[json!(message)]);
    }

    fn hide_error(&mut self) {
        self.call("hideError", &[]);
    }

    fn replace_fragment(&mut self, token: &str) {
        self.fragment = Some(token.to_string());
        let link = session::share_link(token);
        self.call("replaceFragment", &[json!(token), json!(link)]);
    }

    fn apply_theme(&mut self, theme: ThemePreference) {
        let variables: serde_json::Map<String, Value> = palette_for(theme)
            .map(|palette| {
                palette
                    .css_variables()
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), Value::String(value)))
                    .collect()
            })
            .unwrap_or_default();
        self.call("applyTheme", &[json!(theme), Value::Object(variables)]);
    }

    fn rebuild_surfaces(&mut self, theme: ThemePreference, input: &str, output: &str) {
        self.call("rebuildSurfaces", &[json!(theme), json!(input), json!(output)]);
    }

    fn show_version(&mut self, descriptor: &VersionDescriptor) {
        self.call("showVersion", &[json!(descriptor)]);
    }
}
