//! Runtime error types for the ToyScript evaluator.

use thiserror::Error;

use crate::value::{TypeTag, Value};

/// Evaluation failure, or the `return` signal travelling to its call boundary.
///
/// The `Display` text of each variant is the exact message a program sees.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    #[error("Name not found: {0}")]
    NameNotFound(String),
    #[error("Invalid operation: {op}{operand}")]
    InvalidPrefix { op: &'static str, operand: TypeTag },
    #[error("Invalid operation: {left}{op}{right}")]
    InvalidInfix {
        left: TypeTag,
        op: &'static str,
        right: TypeTag,
    },
    #[error("Invalid types in operation: {left}{op}{right}")]
    TypeMismatch {
        left: TypeTag,
        op: &'static str,
        right: TypeTag,
    },
    #[error("{0} binding is not mutable")]
    Immutable(String),
    #[error("Invalid number of arguments: Got {got}, expected {expected}")]
    Arity { got: usize, expected: usize },
    #[error("Wrong number of args for {builtin}: got {got}, expected {expected}")]
    BuiltinArity {
        builtin: &'static str,
        got: usize,
        expected: usize,
    },
    #[error("Type error: {builtin} called with argument of type: {got}")]
    BuiltinType { builtin: &'static str, got: TypeTag },
    #[error("Out of bounds assignment: max index is {max}, attempted to access {index}")]
    OutOfBounds { max: i64, index: i64 },
    #[error("Invalid assignment target: {0}")]
    InvalidTarget(&'static str),
    #[error("Not a function: {0}")]
    NotCallable(TypeTag),
    #[error("No index operation implemented for: {0}")]
    NotIndexable(TypeTag),
    #[error("Invalid index type: {0}")]
    InvalidIndex(TypeTag),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Could not read file: {0}")]
    FileUnreadable(String),
    /// `return` unwinding to the nearest function call or the program.
    #[error("return outside of a function call")]
    Return(Value),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
