//! Desktop shell - winit window hosting the playground page in a webview
//!
//! - `app` - ApplicationHandler and window management
//! - `page` - HTML page and its IPC protocol
//! - `webview` - runtime host backed by the page

pub mod app;
pub mod page;
pub mod webview;

pub use app::{ShellApp, ShellEvent};
