//! End-to-end format cycles through the runtime

mod common;

use common::{advance, edit, started, FailingFormatter, HostCall, TestSession};
use playground::codec;
use playground::session::DEFAULT_SOURCE;
use playground::theme::ThemePreference;

// ========================================================================
// Scenarios
// ========================================================================

#[test]
fn test_successful_format_shows_output_and_updates_link() {
    let (mut runtime, _) = started("");
    edit(&mut runtime, "puts 'hi'");
    assert!(advance(&mut runtime, 200));

    let host = runtime.host();
    assert_eq!(host.output, "puts 'hi'\n");
    assert_eq!(host.error, None);
    let token = host.fragment.as_deref().unwrap();
    assert_eq!(codec::decode(token).unwrap(), "puts 'hi'");
}

#[test]
fn test_broken_source_keeps_last_good_output_and_link() {
    let (mut runtime, _) = started("");
    edit(&mut runtime, "puts 'hi'");
    advance(&mut runtime, 200);
    let good_output = runtime.host().output.clone();

    edit(&mut runtime, "puts 'hi'\ndef broken\n");
    advance(&mut runtime, 200);

    let host = runtime.host();
    let message = host.error.as_deref().unwrap();
    assert!(!message.is_empty());
    assert_eq!(host.output, good_output);
    assert_eq!(
        codec::decode(host.fragment.as_deref().unwrap()).unwrap(),
        "puts 'hi'"
    );
    assert_eq!(runtime.model().output_text(), good_output);
}

#[test]
fn test_startup_without_link_uses_defaults() {
    let (mut runtime, stats) = TestSession::new().build();
    assert_eq!(runtime.model().source(), DEFAULT_SOURCE);
    assert_eq!(runtime.model().theme, ThemePreference::Dark);

    runtime.start();
    assert_eq!(runtime.host().theme, Some(ThemePreference::Dark));
    assert_eq!(stats.calls(), 1);
    assert_eq!(
        runtime.host().output,
        "class Foo\n  def bar(x,y,z)\n    if x\n      y\n    else\n      z\n    end\n  end\nend\n"
    );
}

#[test]
fn test_startup_with_link_formats_immediately() {
    let (mut runtime, stats) = TestSession::new().with_source("if x\ny\nend\n").build();
    assert_eq!(runtime.model().source(), "if x\ny\nend\n");

    runtime.start();

    // No clock movement: the first cycle does not wait for the quiet period
    assert_eq!(runtime.clock().elapsed().as_millis(), 0);
    assert_eq!(stats.calls(), 1);
    assert_eq!(stats.last_source().as_deref(), Some("if x\ny\nend\n"));
    assert_eq!(runtime.host().output, "if x\n  y\nend\n");
}

#[test]
fn test_startup_with_malformed_link_uses_default_silently() {
    let (mut runtime, _) = TestSession::new().with_link("playground://#@@@").build();
    runtime.start();
    assert_eq!(runtime.model().source(), DEFAULT_SOURCE);
    assert_eq!(runtime.host().error, None);
}

#[test]
fn test_startup_with_legacy_latin1_link() {
    let (runtime, _) = TestSession::new()
        .with_link("playground://#cHV0cyAnY2Fm6Sc=")
        .build();
    assert_eq!(runtime.model().source(), "puts 'café'");
}

#[test]
fn test_startup_sequence_order() {
    let (mut runtime, _) = TestSession::new().with_source("x = 1").build();
    runtime.start();
    let token = codec::encode("x = 1");
    assert_eq!(
        runtime.host_mut().drain(),
        vec![
            HostCall::ApplyTheme(ThemePreference::Dark),
            HostCall::SetOutput("x = 1\n".into()),
            HostCall::HideError,
            HostCall::ReplaceFragment(token),
        ]
    );
}

// ========================================================================
// Display invariants
// ========================================================================

#[test]
fn test_each_cycle_changes_exactly_one_surface() {
    let (mut runtime, _) = started("");
    let sources = ["a = 1", "def x", "b = 2", "end", "end\n", "class A\nend"];

    for source in sources {
        edit(&mut runtime, source);
        advance(&mut runtime, 200);

        let calls = runtime.host_mut().drain();
        let outputs = calls.iter().filter(|c| matches!(c, HostCall::SetOutput(_))).count();
        let errors = calls.iter().filter(|c| matches!(c, HostCall::ShowError(_))).count();
        assert_eq!(outputs + errors, 1, "cycle for {:?} produced {:?}", source, calls);
    }
}

#[test]
fn test_failure_leaves_link_untouched() {
    let (mut runtime, _) = started("");
    edit(&mut runtime, "x = 1");
    advance(&mut runtime, 200);
    let before = runtime.host().fragment.clone();

    edit(&mut runtime, "def broken");
    advance(&mut runtime, 200);
    let calls = runtime.host_mut().drain();

    assert!(!calls.iter().any(|c| matches!(c, HostCall::ReplaceFragment(_))));
    assert_eq!(runtime.host().fragment, before);
    assert_eq!(runtime.model().fragment, before);
}

#[test]
fn test_success_after_failure_hides_error() {
    let (mut runtime, _) = started("");
    edit(&mut runtime, "def broken");
    advance(&mut runtime, 200);
    assert!(runtime.host().error.is_some());

    edit(&mut runtime, "def fixed\nend");
    advance(&mut runtime, 200);
    assert_eq!(runtime.host().error, None);
    assert_eq!(runtime.host().output, "def fixed\nend\n");
    assert_eq!(
        codec::decode(runtime.host().fragment.as_deref().unwrap()).unwrap(),
        "def fixed\nend"
    );
}

#[test]
fn test_sentinel_failure_uses_default_message() {
    let mut runtime = TestSession::new()
        .with_source("puts 1")
        .build_with(Box::new(FailingFormatter));
    runtime.start();

    assert_eq!(runtime.host().error.as_deref(), Some("Formatting failed"));
    assert_eq!(runtime.host().output, "");
    assert_eq!(runtime.host().fragment, None);
}

#[test]
fn test_unicode_source_round_trips_through_link() {
    let (mut runtime, _) = started("");
    let source = "puts \"héllo wörld 🦀\"\n";
    edit(&mut runtime, source);
    advance(&mut runtime, 200);

    let token = runtime.host().fragment.clone().unwrap();
    let reopened = TestSession::new()
        .with_link(&format!("playground://#{}", token))
        .build()
        .0;
    assert_eq!(reopened.model().source(), source);
}

#[test]
fn test_cycle_counter() {
    let (mut runtime, _) = started("x");
    assert_eq!(runtime.model().cycles, 1);
    edit(&mut runtime, "y");
    advance(&mut runtime, 200);
    assert_eq!(runtime.model().cycles, 2);
}
