//! End-to-end run workflow tests.
//!
//! Verifies:
//! 1. Zero input call sites dispatch immediately with an empty input list.
//! 2. N call sites open a dialog with exactly N ordered fields.
//! 3. Submitted values reach the request in field order.
//! 4. Cancelling never produces a request and returns no partial input.
//! 5. At most one run is in flight, whatever the trigger sequence.
//! 6. Completion narratives and connectivity failures.

use kotha_run::{
    ConnectivityFailure, ExecutionResult, InputKey, InputScanner, Outcome, RunError, RunPhase,
    RunSession, RunUpdate, ScanMode, classify,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const THREE_INPUTS: &str = "main function {\n    dhoro a = nao();\n    dhoro b = nao();\n    dhoro c = nao();\n}\n";

fn type_into(session: &mut RunSession, text: &str) {
    for c in text.chars() {
        session.dialog_key(InputKey::Char(c)).unwrap();
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1-4. Input arity and collection
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn zero_inputs_dispatch_immediately() {
    let mut session = RunSession::default();
    let update = session.request_run("main function { dekhaw(1); }").unwrap();
    assert_eq!(update.status.as_deref(), Some("Running..."));
    assert_eq!(update.console.as_deref(), Some("Compiling and running...\n"));
    let request = update.request.unwrap();
    assert!(request.inputs.is_empty());
    assert!(matches!(session.phase(), RunPhase::AwaitingResponse));
    assert_eq!(session.requests_dispatched(), 1);
}

#[test]
fn three_call_sites_open_three_fields() {
    let mut session = RunSession::default();
    session.request_run(THREE_INPUTS).unwrap();
    let view = session.collector().unwrap().view();
    assert_eq!(view.fields.len(), 3);
    assert_eq!(view.fields[2].label, "Input 3:");
    assert_eq!(view.focused, 0);
    assert_eq!(session.requests_dispatched(), 0);
}

#[test]
fn submitted_values_keep_field_order() {
    let mut session = RunSession::default();
    session.request_run(THREE_INPUTS).unwrap();

    type_into(&mut session, "5");
    assert!(session.dialog_key(InputKey::Enter).unwrap().is_empty());
    type_into(&mut session, "10");
    session.dialog_key(InputKey::Enter).unwrap();
    type_into(&mut session, "x");
    let update = session.dialog_key(InputKey::Enter).unwrap();

    let request = update.request.unwrap();
    assert_eq!(request.inputs, vec!["5", "10", "x"]);
    assert_eq!(request.code, THREE_INPUTS.trim());
    assert_eq!(
        request.to_json_string().unwrap(),
        serde_json::json!({"code": THREE_INPUTS.trim(), "inputs": ["5", "10", "x"]}).to_string()
    );
}

#[test]
fn host_field_writes_and_explicit_submit() {
    let mut session = RunSession::default();
    session.request_run("nao(); nao();").unwrap();
    assert!(session.dialog_set_field(1, "second"));
    let update = session.dialog_submit().unwrap();
    assert_eq!(update.request.unwrap().inputs, vec!["", "second"]);
}

#[test]
fn cancel_after_one_of_three_yields_no_request() {
    let mut session = RunSession::default();
    session.request_run(THREE_INPUTS).unwrap();
    type_into(&mut session, "5");
    session.dialog_key(InputKey::Enter).unwrap();

    let err = session.dialog_key(InputKey::Escape).unwrap_err();
    assert_eq!(err, RunError::InputCancelled);
    assert_eq!(
        RunUpdate::for_error(&err),
        RunUpdate {
            status: Some("Cancelled".into()),
            console: Some("Execution cancelled by user.".into()),
            request: None,
        }
    );
    assert_eq!(session.requests_dispatched(), 0);
    assert!(session.run_enabled());
}

#[test]
fn explicit_cancel_button() {
    let mut session = RunSession::default();
    session.request_run("nao();").unwrap();
    assert_eq!(session.dialog_cancel(), Err(RunError::InputCancelled));
    assert!(session.run_enabled());
}

#[test]
fn code_only_scanner_ignores_quoted_calls() {
    let mut session = RunSession::new(InputScanner::new("nao", ScanMode::CodeOnly));
    let update = session.request_run("dekhaw(\"nao()\"); // nao()").unwrap();
    assert!(update.request.unwrap().inputs.is_empty());
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Single flight
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn second_trigger_while_awaiting_is_blocked() {
    let mut session = RunSession::default();
    session.request_run("dekhaw(1);").unwrap();
    assert!(!session.run_enabled());
    assert_eq!(session.request_run("dekhaw(2);"), Err(RunError::Busy));
    assert_eq!(session.requests_dispatched(), 1);
}

#[test]
fn second_trigger_while_dialog_open_is_blocked() {
    let mut session = RunSession::default();
    session.request_run("nao();").unwrap();
    assert!(!session.run_enabled());
    assert_eq!(session.request_run("dekhaw(2);"), Err(RunError::Busy));
    assert!(session.collector().unwrap().is_open());
}

#[test]
fn run_is_enabled_again_after_completion() {
    let mut session = RunSession::default();
    session.request_run("dekhaw(1);").unwrap();
    session
        .complete(Err(ConnectivityFailure::Transport("offline".into())))
        .unwrap_err();
    assert!(session.run_enabled());
    assert!(session.request_run("dekhaw(1);").unwrap().request.is_some());
}

#[derive(Debug, Clone)]
enum Action {
    Run(bool),
    Key(InputKey),
    Submit,
    Cancel,
    Respond(i64),
    Fail,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        any::<bool>().prop_map(Action::Run),
        prop_oneof![
            Just(InputKey::Enter),
            Just(InputKey::Escape),
            Just(InputKey::Tab),
            Just(InputKey::Backspace),
            any::<char>().prop_map(InputKey::Char),
        ]
        .prop_map(Action::Key),
        Just(Action::Submit),
        Just(Action::Cancel),
        (-3i64..3).prop_map(Action::Respond),
        Just(Action::Fail),
    ]
}

proptest! {
    #[test]
    fn at_most_one_request_in_flight(actions in prop::collection::vec(arb_action(), 0..60)) {
        let mut session = RunSession::default();
        let mut outstanding = 0u32;
        for action in actions {
            let update = match action {
                Action::Run(with_input) => {
                    let source = if with_input { "dhoro x = nao();" } else { "dekhaw(1);" };
                    session.request_run(source)
                }
                Action::Key(key) => session.dialog_key(key),
                Action::Submit => session.dialog_submit(),
                Action::Cancel => session.dialog_cancel(),
                Action::Respond(code) => {
                    let was_waiting = matches!(session.phase(), RunPhase::AwaitingResponse);
                    let update = session.complete(Ok(ExecutionResult::new(code, "", "")));
                    if was_waiting {
                        outstanding -= 1;
                    }
                    update
                }
                Action::Fail => {
                    let was_waiting = matches!(session.phase(), RunPhase::AwaitingResponse);
                    let update = session.complete(Err(ConnectivityFailure::Transport("x".into())));
                    if was_waiting {
                        outstanding -= 1;
                    }
                    update
                }
            };
            if let Ok(RunUpdate { request: Some(_), .. }) = update {
                outstanding += 1;
            }
            prop_assert!(outstanding <= 1);
            prop_assert_eq!(session.run_enabled(), session.phase().is_idle());
            prop_assert_eq!(outstanding == 1, matches!(session.phase(), RunPhase::AwaitingResponse));
        }
    }

    #[test]
    fn submitted_values_arrive_in_order(values in prop::collection::vec("[a-z0-9 ]{0,6}", 1..6)) {
        let mut session = RunSession::default();
        let source = "nao();\n".repeat(values.len());
        session.request_run(&source).unwrap();
        let mut update = RunUpdate::default();
        for value in &values {
            for c in value.chars() {
                session.dialog_key(InputKey::Char(c)).unwrap();
            }
            update = session.dialog_key(InputKey::Enter).unwrap();
        }
        let request = update.request.unwrap();
        prop_assert_eq!(request.inputs, values);
    }

    #[test]
    fn classification_is_total(code in any::<i64>(), stdout in ".{0,12}", stderr in ".{0,12}") {
        let result = ExecutionResult::new(code, stdout.clone(), stderr.clone());
        let narrative = classify(&result);
        prop_assert_eq!(&narrative, &classify(&result));
        if code == 0 {
            prop_assert_eq!(narrative.outcome, Outcome::Success);
            prop_assert!(narrative.text.starts_with("=== SUCCESS ===\n"));
        } else {
            prop_assert_eq!(narrative.outcome, Outcome::NonZeroExit);
            prop_assert!(narrative.text.starts_with("=== ERROR ===\n"));
            prop_assert_eq!(narrative.text.contains("=== OUTPUT ==="), !stdout.is_empty() || stderr.contains("=== OUTPUT ==="));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Completion
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn success_response_body() {
    let mut session = RunSession::default();
    session.request_run("dekhaw(42);").unwrap();
    let update = session
        .complete_with_body(r#"{"exit_code":0,"stdout":"42\n","stderr":""}"#)
        .unwrap();
    assert_eq!(update.console.as_deref(), Some("=== SUCCESS ===\n42\n"));
    assert_eq!(update.status.as_deref(), Some("Execution complete"));
}

#[test]
fn error_response_body_with_partial_output() {
    let mut session = RunSession::default();
    session.request_run("dekhaw(42);").unwrap();
    let update = session
        .complete_with_body(r#"{"exit_code":2,"stdout":"partial\n","stderr":"crash"}"#)
        .unwrap();
    assert_eq!(
        update.console.as_deref(),
        Some("=== ERROR ===\ncrash\n\n=== OUTPUT ===\npartial\n")
    );
    assert_eq!(update.status.as_deref(), Some("Compilation error"));
}

#[test]
fn out_of_range_and_float_exit_codes_are_errors() {
    for body in [
        r#"{"exit_code":18446744073709551615,"stdout":"","stderr":"boom"}"#,
        r#"{"exit_code":1.0,"stdout":"","stderr":"boom"}"#,
    ] {
        let mut session = RunSession::default();
        session.request_run("dekhaw(42);").unwrap();
        let update = session.complete_with_body(body).unwrap();
        assert!(update.console.unwrap().starts_with("=== ERROR ===\nboom"));
        assert_eq!(update.status.as_deref(), Some("Compilation error"));
        assert!(session.run_enabled());
    }
}

#[test]
fn malformed_body_is_a_connectivity_failure() {
    let mut session = RunSession::default();
    session.request_run("dekhaw(42);").unwrap();
    let err = session.complete_with_body("Internal Server Error").unwrap_err();
    assert!(matches!(
        err,
        RunError::ConnectivityFailure(ConnectivityFailure::MalformedResponse(_))
    ));
    let update = RunUpdate::for_error(&err);
    assert_eq!(update.status.as_deref(), Some("Server error"));
    assert!(
        update
            .console
            .unwrap()
            .starts_with("Error: Cannot connect to server\nmalformed response: ")
    );
    assert!(session.run_enabled());
}
