//! ToyScript interpreter driver.
//!
//! ```text
//! source → Lexer → Parser → Program → Evaluator → Value
//! ```
//!
//! The binary either runs one file or starts a REPL over a persistent
//! global scope.

pub mod config;
pub mod driver;
pub mod repl;

use std::sync::Once;

pub use config::{Config, USAGE};
pub use driver::{
    execute, exit_code, format_parse_errors, parse_source, report, run_file, run_program,
    run_source, DriverError, Outcome,
};
pub use repl::{repl, BANNER, PROMPT};

static TRACING_INIT: Once = Once::new();

/// Install the stderr log subscriber, once, and only when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
