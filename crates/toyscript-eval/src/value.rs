//! Runtime values.
//!
//! Sequences, strings and closures are shared by `Rc` handle, so binding a
//! value or returning it from a call never copies its contents.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use toyscript_types::ast::AstList;
use toyscript_types::Ast;

use crate::builtins::Builtin;
use crate::env::Env;

/// Runtime type of a [`Value`], also a first-class value via `type(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Error,
    Int,
    Bool,
    Str,
    List,
    Array,
    Function,
    Builtin,
    Type,
}

impl TypeTag {
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "NULL",
            TypeTag::Error => "ERROR",
            TypeTag::Int => "INT",
            TypeTag::Bool => "BOOL",
            TypeTag::Str => "STR",
            TypeTag::List => "LIST",
            TypeTag::Array => "ARRAY",
            TypeTag::Function => "FUNCTION",
            TypeTag::Builtin => "BUILTIN",
            TypeTag::Type => "TYPE",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A closure: parameter names, body, and the scope it was created in.
pub struct Function {
    /// The tree the body lives in; kept alive as long as the closure is.
    pub ast: Rc<Ast>,
    pub params: Vec<String>,
    pub body: AstList,
    pub env: Env,
}

impl fmt::Debug for Function {
    // The captured scope can contain this closure, so it is not printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("body_len", &self.body.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Error(String),
    Int(i64),
    Bool(bool),
    Str(Rc<str>),
    /// Growable sequence; `push`, `cons`, `concat` and `+` extend it in place.
    List(Rc<RefCell<Vec<Value>>>),
    /// Fixed-length sequence; elements are replaceable, length is not.
    Array(Rc<RefCell<Box<[Value]>>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Type(TypeTag),
}

impl Value {
    pub fn str(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(items.into_boxed_slice())))
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Error(_) => TypeTag::Error,
            Value::Int(_) => TypeTag::Int,
            Value::Bool(_) => TypeTag::Bool,
            Value::Str(_) => TypeTag::Str,
            Value::List(_) => TypeTag::List,
            Value::Array(_) => TypeTag::Array,
            Value::Function(_) => TypeTag::Function,
            Value::Builtin(_) => TypeTag::Builtin,
            Value::Type(_) => TypeTag::Type,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null | Value::Error(_) => false,
            Value::Int(n) => *n != 0,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Snapshot of a List's or Array's elements.
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.borrow().clone()),
            Value::Array(items) => Some(items.borrow().to_vec()),
            _ => None,
        }
    }

    /// Element count of a List or Array.
    pub fn seq_len(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.borrow().len()),
            Value::Array(items) => Some(items.borrow().len()),
            _ => None,
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Error(message) => f.write_str(message),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => write_items(f, &items.borrow()),
            Value::Array(items) => write_items(f, &items.borrow()),
            Value::Function(func) => write!(f, "fn({}) {{...}}", func.params.join(", ")),
            Value::Builtin(builtin) => write!(f, "builtin {}", builtin.name()),
            Value::Type(tag) => f.write_str(tag.name()),
        }
    }
}

/// Structural equality on data; identity on closures.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            _ => false,
        }
    }
}
