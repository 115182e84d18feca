//! ToyScript CLI
//!
//! `toyscript FILE` runs a script; `toyscript` alone starts the REPL.

use std::io;
use std::process;

use toyscript::{init_tracing, repl, run_file, Config, USAGE};
use toyscript_eval::Evaluator;

fn main() {
    init_tracing();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!();
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    if config.help {
        println!("{USAGE}");
        return;
    }

    let mut evaluator = Evaluator::new();
    let mut stdout = io::stdout();
    let result = match &config.file {
        Some(path) => run_file(path, &config, &mut evaluator, &mut stdout),
        None => repl(io::stdin().lock(), &mut stdout, &mut evaluator, &config).map(|()| 0),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
