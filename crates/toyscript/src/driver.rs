//! Parsing, evaluation and reporting shared by the file runner and the REPL.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toyscript_eval::{Env, Evaluator, Host, Value};
use toyscript_parser::ast_string;
use toyscript_types::{ParseErrors, Program, SourceFile};

use crate::config::Config;

/// Failures of the driver itself, as opposed to failures of the program.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("unexpected argument: {0}")]
    ExtraArgument(String),
    #[error("could not read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode errors as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// How a run of one source text ended.
#[derive(Debug)]
pub enum Outcome {
    ParseFailed(ParseErrors),
    Failed(String),
    Completed(Value),
}

pub fn parse_source(name: &str, source: &str) -> Result<Program, ParseErrors> {
    toyscript_parser::parse_source(&SourceFile::new(name, source)).into_result()
}

pub fn run_program<H: Host>(program: &Program, evaluator: &mut Evaluator<H>, env: &Env) -> Outcome {
    match evaluator.run(program, env) {
        Ok(value) => Outcome::Completed(value),
        Err(e) => Outcome::Failed(e.to_string()),
    }
}

pub fn run_source<H: Host>(
    name: &str,
    source: &str,
    evaluator: &mut Evaluator<H>,
    env: &Env,
) -> Outcome {
    match parse_source(name, source) {
        Ok(program) => run_program(&program, evaluator, env),
        Err(errors) => Outcome::ParseFailed(errors),
    }
}

/// Process exit status for an outcome: failures are 1, an integer result is
/// its own status, anything else is 0.
pub fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::ParseFailed(_) | Outcome::Failed(_) => 1,
        Outcome::Completed(Value::Int(n)) => *n as i32,
        Outcome::Completed(_) => 0,
    }
}

pub fn format_parse_errors(errors: &ParseErrors, json: bool) -> Result<String, DriverError> {
    if json {
        return Ok(serde_json::to_string_pretty(errors)?);
    }
    let mut text = String::from("Parser has errors.");
    for error in errors {
        text.push('\n');
        text.push_str(&format!("{}:{error}", error.file));
    }
    let dropped = errors.total_errors.saturating_sub(errors.errors.len());
    if dropped > 0 {
        text.push_str(&format!("\n... and {dropped} more"));
    }
    Ok(text)
}

/// Parse `source`, echo its canonical form under `--ast`, and evaluate it.
pub fn execute<H: Host, W: Write>(
    name: &str,
    source: &str,
    config: &Config,
    evaluator: &mut Evaluator<H>,
    env: &Env,
    out: &mut W,
) -> Result<Outcome, DriverError> {
    let program = match parse_source(name, source) {
        Ok(program) => program,
        Err(errors) => return Ok(Outcome::ParseFailed(errors)),
    };
    if config.print_ast {
        writeln!(out, "{}", ast_string(&program))?;
    }
    Ok(run_program(&program, evaluator, env))
}

/// Print parse errors or the runtime error. A completed value is printed
/// only when `echo` is set.
pub fn report<W: Write>(
    outcome: &Outcome,
    config: &Config,
    echo: bool,
    out: &mut W,
) -> Result<(), DriverError> {
    match outcome {
        Outcome::ParseFailed(errors) => {
            writeln!(out, "{}", format_parse_errors(errors, config.json_errors)?)?;
        }
        Outcome::Failed(message) => writeln!(out, "{message}")?,
        Outcome::Completed(value) if echo => writeln!(out, "{value}")?,
        Outcome::Completed(_) => {}
    }
    Ok(())
}

/// Run a script file in a fresh global scope and return its exit status.
pub fn run_file<H: Host, W: Write>(
    path: &Path,
    config: &Config,
    evaluator: &mut Evaluator<H>,
    out: &mut W,
) -> Result<i32, DriverError> {
    let source = std::fs::read_to_string(path).map_err(|source| DriverError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path.display().to_string();
    tracing::debug!(file = %name, bytes = source.len(), "driver: running file");
    let outcome = execute(&name, &source, config, evaluator, &Env::new(), out)?;
    report(&outcome, config, false, out)?;
    let code = exit_code(&outcome);
    tracing::debug!(file = %name, code, "driver: finished");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&Outcome::Completed(Value::Int(3))), 3);
        assert_eq!(exit_code(&Outcome::Completed(Value::Bool(true))), 0);
        assert_eq!(exit_code(&Outcome::Completed(Value::Null)), 0);
        assert_eq!(exit_code(&Outcome::Failed("boom".into())), 1);
        assert_eq!(exit_code(&Outcome::ParseFailed(ParseErrors::empty())), 1);
    }

    #[test]
    fn test_exit_code_truncates_to_i32() {
        let big = Outcome::Completed(Value::Int((1_i64 << 32) + 7));
        assert_eq!(exit_code(&big), 7);
    }

    #[test]
    fn test_plain_parse_error_report() {
        let errors = parse_source("main.ts", "val x = ;").unwrap_err();
        let text = format_parse_errors(&errors, false).unwrap();
        assert_eq!(
            text,
            "Parser has errors.\nmain.ts:1:9: E102 prefix not recognized: SEMICOLON"
        );
    }
}
