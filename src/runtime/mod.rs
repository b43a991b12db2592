//! Runtime - executes commands produced by `update`
//!
//! The runtime owns the session model together with every collaborator a
//! command can touch: the formatter, the preference store, the display
//! [`Host`], the clock and the debounce timer. Whatever drives the event loop
//! (the desktop shell, or a test) feeds it messages and calls [`Runtime::tick`].
//!
//! ```text
//! Msg → update(model) → Cmd → process_cmd ─┬─ Host (output, error, fragment, theme)
//!                                          ├─ ResettableTimer (debounce)
//!                                          ├─ Formatter (synchronous, guarded)
//!                                          ├─ PreferenceStore (synchronous write)
//!                                          └─ thread → mpsc → process_async_messages
//! ```

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use crate::commands::Cmd;
use crate::formatter::{run_guarded, Formatter};
use crate::messages::{AppMsg, FormatMsg, Msg};
use crate::model::PlaygroundModel;
use crate::prefs::PreferenceStore;
use crate::scheduler::{Clock, ResettableTimer, SystemClock};
use crate::theme::ThemePreference;
use crate::update::update;
use crate::version::VersionDescriptor;

/// The display side of the editor widget boundary
pub trait Host {
    /// Replace the whole output surface content
    fn set_output(&mut self, text: &str);

    fn show_error(&mut self, message: &str);

    fn hide_error(&mut self);

    /// Replace the current URL fragment without creating a history entry
    fn replace_fragment(&mut self, token: &str);

    /// Set the page-level theme attribute
    fn apply_theme(&mut self, theme: ThemePreference);

    /// Tear down and rebuild both surfaces with `theme`, restoring their text
    fn rebuild_surfaces(&mut self, theme: ThemePreference, input: &str, output: &str);

    fn show_version(&mut self, descriptor: &VersionDescriptor);
}

pub struct Runtime<H: Host, C: Clock = SystemClock> {
    model: PlaygroundModel,
    formatter: Box<dyn Formatter>,
    store: Box<dyn PreferenceStore>,
    host: H,
    clock: C,
    timer: ResettableTimer,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
}

impl<H: Host> Runtime<H, SystemClock> {
    pub fn new(
        model: PlaygroundModel,
        formatter: Box<dyn Formatter>,
        store: Box<dyn PreferenceStore>,
        host: H,
    ) -> Self {
        Self::with_clock(model, formatter, store, host, SystemClock)
    }
}

impl<H: Host, C: Clock> Runtime<H, C> {
    pub fn with_clock(
        model: PlaygroundModel,
        formatter: Box<dyn Formatter>,
        store: Box<dyn PreferenceStore>,
        host: H,
        clock: C,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        tracing::debug!("Runtime using formatter '{}'", formatter.name());
        Self {
            model,
            formatter,
            store,
            host,
            clock,
            timer: ResettableTimer::new(),
            msg_tx,
            msg_rx,
        }
    }

    /// Run the startup sequence: apply theme, format once, load version
    pub fn start(&mut self) {
        self.dispatch(Msg::App(AppMsg::Started));
    }

    /// Handle one message and execute the resulting command
    pub fn dispatch(&mut self, msg: Msg) {
        if let Some(cmd) = update(&mut self.model, msg) {
            self.process_cmd(cmd);
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }

            Cmd::StartDebounce { ticket, delay } => {
                let deadline = self.clock.now() + delay;
                if let Some(cancelled) = self.timer.reset(ticket, deadline) {
                    tracing::trace!("Timer {} replaced by {}", cancelled.0, ticket.0);
                }
            }
            Cmd::RunFormat { source } => {
                let started = Instant::now();
                let outcome = run_guarded(self.formatter.as_ref(), &source);
                tracing::debug!(
                    "{} finished in {:?} ({})",
                    self.formatter.name(),
                    started.elapsed(),
                    if outcome.is_ok() { "ok" } else { "failed" }
                );
                self.dispatch(Msg::Format(FormatMsg::Completed { source, outcome }));
            }

            Cmd::SetOutput(text) => self.host.set_output(&text),
            Cmd::ShowError(message) => self.host.show_error(&message),
            Cmd::HideError => self.host.hide_error(),
            Cmd::ReplaceFragment(token) => self.host.replace_fragment(&token),

            Cmd::SavePreference { key, value } => {
                if let Err(e) = self.store.set(key, &value) {
                    tracing::warn!("Failed to save preference {}: {}", key, e);
                }
            }
            Cmd::ApplyTheme(theme) => self.host.apply_theme(theme),
            Cmd::RebuildSurfaces {
                theme,
                input,
                output,
            } => self.host.rebuild_surfaces(theme, &input, &output),

            Cmd::LoadVersion { path } => {
                let tx = self.msg_tx.clone();
                std::thread::spawn(move || {
                    let result = VersionDescriptor::load(&path);
                    let _ = tx.send(Msg::App(AppMsg::VersionLoaded(result)));
                });
            }
            Cmd::ShowVersion(descriptor) => self.host.show_version(&descriptor),
        }
    }

    /// Fire the debounce timer if its deadline has passed
    ///
    /// Returns true when a timer fired.
    pub fn tick(&mut self) -> bool {
        match self.timer.poll(self.clock.now()) {
            Some(ticket) => {
                self.dispatch(Msg::Format(FormatMsg::TimerFired(ticket)));
                true
            }
            None => false,
        }
    }

    /// Handle results sent back by background work
    ///
    /// Returns the number of messages processed.
    pub fn process_async_messages(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            processed += 1;
        }
        processed
    }

    /// When the event loop must wake up next for the debounce timer
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn model(&self) -> &PlaygroundModel {
        &self.model
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn store(&self) -> &dyn PreferenceStore {
        self.store.as_ref()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
