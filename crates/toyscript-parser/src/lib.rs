//! ToyScript parser: converts a token stream into an AST.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::{ParseResult, Parser, Precedence};
pub use toyscript_types::ast_string;

use toyscript_lexer::Lexer;
use toyscript_types::SourceFile;

/// Lex and parse a whole source file.
pub fn parse_source(source_file: &SourceFile) -> ParseResult {
    Parser::new(Lexer::new(source_file), source_file).parse()
}
