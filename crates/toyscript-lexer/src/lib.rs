//! ToyScript lexer: converts source text into tokens on demand.

pub mod lexer;
pub mod token;

pub use lexer::{Lexer, TokenSource};
pub use token::{Token, TokenKind, KEYWORDS};
