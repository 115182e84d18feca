//! Command-line options.

use std::path::PathBuf;

use crate::driver::DriverError;

pub const USAGE: &str = "\
Usage: toyscript [FILE] [options]

Runs FILE, or starts a REPL when no file is given.

Options:
  --ast           Print the parsed program before evaluating it
  --json-errors   Report parse errors as JSON
  -h, --help      Show this message";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub file: Option<PathBuf>,
    pub print_ast: bool,
    pub json_errors: bool,
    pub help: bool,
}

impl Config {
    /// Parse arguments, excluding the program name.
    pub fn from_args<I>(args: I) -> Result<Self, DriverError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut config = Config::default();
        for arg in args {
            let arg = arg.into();
            match arg.as_str() {
                "--ast" => config.print_ast = true,
                "--json-errors" => config.json_errors = true,
                "-h" | "--help" => config.help = true,
                flag if flag.starts_with('-') && flag != "-" => {
                    return Err(DriverError::UnknownOption(arg));
                }
                _ if config.file.is_none() => config.file = Some(PathBuf::from(arg)),
                _ => return Err(DriverError::ExtraArgument(arg)),
            }
        }
        Ok(config)
    }
}
