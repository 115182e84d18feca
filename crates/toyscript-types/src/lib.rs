//! Shared types for the ToyScript interpreter.
//!
//! This crate holds everything the lexer, parser and evaluator agree on:
//! source spans, parse errors, the [`Region`] allocator and the
//! region-backed AST.

mod ast_string;
mod error;
mod span;
pub mod ast;
pub mod region;

pub use ast::{Ast, AstList, NodeId, Program};
pub use ast_string::ast_string;
pub use error::{ErrorCode, ParseError, ParseErrors, MAX_ERRORS};
pub use region::{Handle, Mark, Region, RegionStats};
pub use span::{SourceFile, Span};
