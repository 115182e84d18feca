//! End-to-end tests: source text through parse, evaluation and reporting.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use toyscript::{
    execute, exit_code, format_parse_errors, repl, report, run_file, run_source, Config,
    DriverError, Outcome,
};
use toyscript_eval::{CaptureHost, Env, Evaluator, Value};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn evaluator() -> Evaluator<CaptureHost> {
    Evaluator::with_host(CaptureHost::new())
}

fn outcome(source: &str) -> Outcome {
    run_source("test.ts", source, &mut evaluator(), &Env::new())
}

/// Full REPL transcript for the given input lines.
fn session(input: &str, config: &Config) -> (String, Vec<String>) {
    let mut out = Vec::new();
    let mut evaluator = evaluator();
    repl(input.as_bytes(), &mut out, &mut evaluator, config).unwrap();
    (String::from_utf8(out).unwrap(), evaluator.host.lines)
}

/// Write `source` to a fresh file under the system temp dir.
fn script(name: &str, source: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("toyscript-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path
}

// ══════════════════════════════════════════════════════════════════════════════
// Outcomes
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_completed_outcome() {
    let result = outcome("val x = 20; x + 22");
    assert!(matches!(result, Outcome::Completed(Value::Int(42))));
    assert_eq!(exit_code(&result), 42);
}

#[test]
fn test_runtime_failure_outcome() {
    let result = outcome("val x = 5; x = 10; x");
    match &result {
        Outcome::Failed(message) => assert_eq!(message, "x binding is not mutable"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(exit_code(&result), 1);
}

#[test]
fn test_parse_failure_outcome() {
    let result = outcome("val = 1");
    let Outcome::ParseFailed(errors) = &result else {
        panic!("expected parse failure");
    };
    assert_eq!(
        errors.first_message(),
        Some("expected name after 'val', got '='")
    );
    assert_eq!(exit_code(&result), 1);
}

#[test]
fn test_json_errors() {
    let Outcome::ParseFailed(errors) = outcome("(1 + 2") else {
        panic!("expected parse failure");
    };
    let json = format_parse_errors(&errors, true).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["total_errors"], 1);
    assert_eq!(parsed["errors"][0]["file"], "test.ts");
    assert_eq!(parsed["errors"][0]["line"], 1);
    assert_eq!(
        parsed["errors"][0]["message"],
        "expected ')' to close group, got 'end of input'"
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Reporting
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_execute_prints_ast_first() {
    let config = Config {
        print_ast: true,
        ..Config::default()
    };
    let mut out = Vec::new();
    let mut evaluator = evaluator();
    let result = execute(
        "test.ts",
        "val x = 1 + 2 * 3; x",
        &config,
        &mut evaluator,
        &Env::new(),
        &mut out,
    )
    .unwrap();
    report(&result, &config, true, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "val x = (1+(2*3));\nx\n7\n"
    );
}

#[test]
fn test_report_skips_value_without_echo() {
    let mut out = Vec::new();
    let result = Outcome::Completed(Value::Int(1));
    report(&result, &Config::default(), false, &mut out).unwrap();
    assert!(out.is_empty());
}

// ══════════════════════════════════════════════════════════════════════════════
// REPL
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_repl_keeps_global_scope() {
    let input = "var n = 1\nval inc = fn() { n = n + 1 }\ninc()\nn\nexit\n";
    let (transcript, _) = session(input, &Config::default());
    assert_eq!(
        transcript,
        "-TOYSCRIPT REPL-\n~ 1\n~ fn() {...}\n~ 2\n~ 2\n~ "
    );
}

#[test]
fn test_repl_reports_errors_and_continues() {
    let input = "val x = 1\nx = 2\n)\nx\n";
    let (transcript, _) = session(input, &Config::default());
    let expected = "-TOYSCRIPT REPL-\n\
                    ~ 1\n\
                    ~ x binding is not mutable\n\
                    ~ Parser has errors.\nrepl:1:1: E102 prefix not recognized: RPAREN\n\
                    ~ 1\n\
                    ~ \n";
    assert_eq!(transcript, expected);
}

#[test]
fn test_repl_print_goes_through_host() {
    let (transcript, printed) = session("print(\"hi\", 1)\n\n", &Config::default());
    assert_eq!(printed, vec!["hi1".to_string()]);
    assert_eq!(transcript, "-TOYSCRIPT REPL-\n~ null\n~ ~ \n");
}

// ══════════════════════════════════════════════════════════════════════════════
// Files
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_run_file_exit_code_is_result() {
    let path = script("exit.ts", "val f = fn(n) { n * 2 };\nf(21)\n");
    let mut out = Vec::new();
    let code = run_file(&path, &Config::default(), &mut evaluator(), &mut out).unwrap();
    assert_eq!(code, 42);
    assert!(out.is_empty());
}

#[test]
fn test_run_file_reports_runtime_error() {
    let path = script("fail.ts", "print(\"before\");\n1 / 0;\nprint(\"after\")\n");
    let mut out = Vec::new();
    let mut evaluator = evaluator();
    let code = run_file(&path, &Config::default(), &mut evaluator, &mut out).unwrap();
    assert_eq!(code, 1);
    assert_eq!(String::from_utf8(out).unwrap(), "Division by zero\n");
    assert_eq!(evaluator.host.lines, vec!["before".to_string()]);
}

#[test]
fn test_run_file_reports_parse_errors() {
    let path = script("broken.ts", "val x = 1;\nif (x { 2 }\n");
    let mut out = Vec::new();
    let code = run_file(&path, &Config::default(), &mut evaluator(), &mut out).unwrap();
    assert_eq!(code, 1);
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Parser has errors.\n"), "{text}");
    assert!(text.contains("expected ')' after condition, got '{'"), "{text}");
}

#[test]
fn test_run_file_missing() {
    let path = PathBuf::from("/definitely/not/here.ts");
    let err = run_file(&path, &Config::default(), &mut evaluator(), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, DriverError::ReadFile { .. }));
    assert!(err.to_string().starts_with("could not read /definitely/not/here.ts"));
}
