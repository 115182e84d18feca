//! The evaluator's window onto the outside world: `print` output and
//! `slurp` file reads.

use std::collections::HashMap;
use std::io::{self, Write};

pub trait Host {
    fn write_line(&mut self, line: &str);
    fn read_file(&mut self, path: &str) -> io::Result<String>;
}

/// Stdout and the real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdHost;

impl Host for StdHost {
    fn write_line(&mut self, line: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "host: stdout write failed");
        }
    }

    fn read_file(&mut self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Records printed lines and serves files from memory.
#[derive(Debug, Default, Clone)]
pub struct CaptureHost {
    pub lines: Vec<String>,
    pub files: HashMap<String, String>,
}

impl CaptureHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    /// Printed output joined with newlines.
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }
}

impl Host for CaptureHost {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn read_file(&mut self, path: &str) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}
