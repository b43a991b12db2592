//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use playground::config::PlaygroundConfig;
use playground::formatter::{self, FormatError, FormatOutcome, Formatter};
use playground::prefs::MemoryStore;
use playground::runtime::{Host, Runtime};
use playground::scheduler::ManualClock;
use playground::session;
use playground::theme::ThemePreference;
use playground::version::VersionDescriptor;

/// One call made by the runtime into the display host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SetOutput(String),
    ShowError(String),
    HideError,
    ReplaceFragment(String),
    ApplyTheme(ThemePreference),
    RebuildSurfaces {
        theme: ThemePreference,
        input: String,
        output: String,
    },
    ShowVersion(VersionDescriptor),
}

/// Host that records every call and mirrors the visible page state
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    pub output: String,
    pub error: Option<String>,
    pub fragment: Option<String>,
    pub theme: Option<ThemePreference>,
    pub version: Option<VersionDescriptor>,
}

impl RecordingHost {
    /// Calls recorded since the last drain
    pub fn drain(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn count(&self, matches: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|call| matches(call)).count()
    }
}

impl Host for RecordingHost {
    fn set_output(&mut self, text: &str) {
        self.output = text.to_string();
        self.calls.push(HostCall::SetOutput(text.to_string()));
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.calls.push(HostCall::ShowError(message.to_string()));
    }

    fn hide_error(&mut self) {
        self.error = None;
        self.calls.push(HostCall::HideError);
    }

    fn replace_fragment(&mut self, token: &str) {
        self.fragment = Some(token.to_string());
        self.calls.push(HostCall::ReplaceFragment(token.to_string()));
    }

    fn apply_theme(&mut self, theme: ThemePreference) {
        self.theme = Some(theme);
        self.calls.push(HostCall::ApplyTheme(theme));
    }

    fn rebuild_surfaces(&mut self, theme: ThemePreference, input: &str, output: &str) {
        self.calls.push(HostCall::RebuildSurfaces {
            theme,
            input: input.to_string(),
            output: output.to_string(),
        });
    }

    fn show_version(&mut self, descriptor: &VersionDescriptor) {
        self.version = Some(descriptor.clone());
        self.calls.push(HostCall::ShowVersion(descriptor.clone()));
    }
}

/// Counters shared between a test and the formatter it handed to the runtime
#[derive(Debug, Clone, Default)]
pub struct FormatStats {
    pub calls: Rc<Cell<usize>>,
    pub in_flight: Rc<Cell<usize>>,
    pub max_in_flight: Rc<Cell<usize>>,
    pub last_source: Rc<std::cell::RefCell<Option<String>>>,
}

impl FormatStats {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_source(&self) -> Option<String> {
        self.last_source.borrow().clone()
    }
}

/// Wraps the built-in engine and counts invocations
pub struct CountingFormatter {
    inner: Box<dyn Formatter>,
    stats: FormatStats,
}

impl CountingFormatter {
    pub fn builtin() -> (Self, FormatStats) {
        let stats = FormatStats::default();
        let formatter = Self {
            inner: formatter::from_config(&Default::default()),
            stats: stats.clone(),
        };
        (formatter, stats)
    }
}

impl Formatter for CountingFormatter {
    fn name(&self) -> &str {
        "counting"
    }

    fn format(&self, source: &str) -> FormatOutcome {
        let stats = &self.stats;
        stats.calls.set(stats.calls.get() + 1);
        stats.in_flight.set(stats.in_flight.get() + 1);
        stats
            .max_in_flight
            .set(stats.max_in_flight.get().max(stats.in_flight.get()));
        *stats.last_source.borrow_mut() = Some(source.to_string());

        let outcome = self.inner.format(source);

        stats.in_flight.set(stats.in_flight.get() - 1);
        outcome
    }
}

/// Engine that always fails through the sentinel path
pub struct FailingFormatter;

impl Formatter for FailingFormatter {
    fn name(&self) -> &str {
        "failing"
    }

    fn format(&self, _source: &str) -> FormatOutcome {
        Err(FormatError::unexplained())
    }
}

pub type TestRuntime = Runtime<RecordingHost, ManualClock>;

/// Builder for a runtime wired to in-memory collaborators
pub struct TestSession {
    pub config: PlaygroundConfig,
    pub store: MemoryStore,
    pub link: Option<String>,
}

impl TestSession {
    pub fn new() -> Self {
        Self {
            config: PlaygroundConfig::default(),
            store: MemoryStore::new(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: &str) -> Self {
        self.link = Some(link.to_string());
        self
    }

    pub fn with_source(self, source: &str) -> Self {
        let link = format!("playground://#{}", playground::codec::encode(source));
        self.with_link(&link)
    }

    pub fn with_stored_theme(mut self, value: &str) -> Self {
        self.store = self.store.with("theme", value);
        self
    }

    /// Build with the counting built-in formatter; the runtime is not started
    pub fn build(self) -> (TestRuntime, FormatStats) {
        let (formatter, stats) = CountingFormatter::builtin();
        (self.build_with(Box::new(formatter)), stats)
    }

    pub fn build_with(self, formatter: Box<dyn Formatter>) -> TestRuntime {
        let model = session::bootstrap(self.config, &self.store, self.link.as_deref());
        Runtime::with_clock(
            model,
            formatter,
            Box::new(self.store),
            RecordingHost::default(),
            ManualClock::new(),
        )
    }
}

/// Start a runtime on `source` and clear the startup calls
pub fn started(source: &str) -> (TestRuntime, FormatStats) {
    let (mut runtime, stats) = TestSession::new().with_source(source).build();
    runtime.start();
    runtime.host_mut().drain();
    (runtime, stats)
}

/// Move the logical clock forward and fire a due timer
pub fn advance(runtime: &mut TestRuntime, millis: u64) -> bool {
    runtime.clock().advance(Duration::from_millis(millis));
    runtime.tick()
}

/// Type `text` into the input surface
pub fn edit(runtime: &mut TestRuntime, text: &str) {
    runtime.dispatch(playground::Msg::edit(text));
}
