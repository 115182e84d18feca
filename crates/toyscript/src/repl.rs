//! Interactive read-eval-print loop.

use std::io::{BufRead, Write};

use toyscript_eval::{Env, Evaluator, Host};

use crate::config::Config;
use crate::driver::{execute, report, DriverError};

pub const BANNER: &str = "-TOYSCRIPT REPL-";
pub const PROMPT: &str = "~ ";

/// Read lines from `input` until `exit` or end of input, evaluating each in
/// one global scope and printing its result.
pub fn repl<R: BufRead, W: Write, H: Host>(
    input: R,
    out: &mut W,
    evaluator: &mut Evaluator<H>,
    config: &Config,
) -> Result<(), DriverError> {
    let env = Env::new();
    writeln!(out, "{BANNER}")?;
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;
        let line = line.trim();
        if line == "exit" {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let outcome = execute("repl", line, config, evaluator, &env, out)?;
        report(&outcome, config, true, out)?;
    }
    tracing::debug!(bindings = env.len(), "repl: exit");
    Ok(())
}
