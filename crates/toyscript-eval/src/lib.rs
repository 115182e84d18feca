//! ToyScript tree-walking evaluator.
//!
//! Walks the region-backed AST directly. Values and scopes are
//! reference-counted, so closures and return values cross call boundaries
//! by handle. Per-call argument frames live in a [`Region`] that is rolled
//! back when the call returns.
//!
//! [`Region`]: toyscript_types::Region

pub mod builtins;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod host;
pub mod value;

pub use builtins::Builtin;
pub use env::{Binding, Env};
pub use error::{EvalError, EvalResult};
pub use evaluator::Evaluator;
pub use host::{CaptureHost, Host, StdHost};
pub use value::{Function, TypeTag, Value};
