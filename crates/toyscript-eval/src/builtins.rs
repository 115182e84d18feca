//! Builtin functions, resolved by name when no binding shadows them.

use std::io;
use std::rc::Rc;

use crate::error::{EvalError, EvalResult};
use crate::host::Host;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Print,
    List,
    Len,
    Push,
    Car,
    Cdr,
    Cons,
    Concat,
    Last,
    Type,
    Slurp,
}

impl Builtin {
    pub const ALL: [Builtin; 11] = [
        Builtin::Print,
        Builtin::List,
        Builtin::Len,
        Builtin::Push,
        Builtin::Car,
        Builtin::Cdr,
        Builtin::Cons,
        Builtin::Concat,
        Builtin::Last,
        Builtin::Type,
        Builtin::Slurp,
    ];

    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::List => "list",
            Builtin::Len => "len",
            Builtin::Push => "push",
            Builtin::Car => "car",
            Builtin::Cdr => "cdr",
            Builtin::Cons => "cons",
            Builtin::Concat => "concat",
            Builtin::Last => "last",
            Builtin::Type => "type",
            Builtin::Slurp => "slurp",
        }
    }

    /// Fixed argument count; `None` for variadic builtins.
    pub fn arity(self) -> Option<usize> {
        match self {
            Builtin::Print | Builtin::List => None,
            Builtin::Push | Builtin::Cons | Builtin::Concat => Some(2),
            _ => Some(1),
        }
    }

    pub fn call(self, args: &[Value], host: &mut dyn Host) -> EvalResult<Value> {
        if let Some(expected) = self.arity() {
            if args.len() != expected {
                return Err(EvalError::BuiltinArity {
                    builtin: self.name(),
                    got: args.len(),
                    expected,
                });
            }
        }
        tracing::trace!(builtin = self.name(), args = args.len(), "builtin call");
        match self {
            Builtin::Print => {
                let line: String = args.iter().map(ToString::to_string).collect();
                host.write_line(&line);
                Ok(Value::Null)
            }
            Builtin::List => Ok(Value::list(args.to_vec())),
            Builtin::Len => match &args[0] {
                Value::Str(s) => Ok(Value::Int(s.len() as i64)),
                other => match other.seq_len() {
                    Some(n) => Ok(Value::Int(n as i64)),
                    None => Err(self.type_error(other)),
                },
            },
            Builtin::Push => self.append(&args[0], vec![args[1].clone()]),
            Builtin::Car => self.first(&args[0]),
            Builtin::Cdr => self.rest(&args[0]),
            Builtin::Cons => {
                let tail = match &args[1] {
                    Value::Null => {
                        self.expect_seq(&args[0])?;
                        return Ok(args[0].clone());
                    }
                    x => x.elements().unwrap_or_else(|| vec![x.clone()]),
                };
                self.append(&args[0], tail)
            }
            Builtin::Concat => self.concat(&args[0], &args[1]),
            Builtin::Last => {
                let items = self.expect_seq(&args[0])?;
                Ok(items.last().cloned().unwrap_or(Value::Null))
            }
            Builtin::Type => Ok(Value::Type(args[0].type_tag())),
            Builtin::Slurp => {
                let Value::Str(path) = &args[0] else {
                    return Err(self.type_error(&args[0]));
                };
                self.slurp(path, host)
            }
        }
    }

    fn type_error(self, got: &Value) -> EvalError {
        EvalError::BuiltinType {
            builtin: self.name(),
            got: got.type_tag(),
        }
    }

    fn expect_seq(self, seq: &Value) -> EvalResult<Vec<Value>> {
        seq.elements().ok_or_else(|| self.type_error(seq))
    }

    /// Lists grow in place and are returned as the same handle; arrays are
    /// copied into a new, longer array.
    fn append(self, seq: &Value, tail: Vec<Value>) -> EvalResult<Value> {
        match seq {
            Value::List(items) => {
                items.borrow_mut().extend(tail);
                Ok(seq.clone())
            }
            Value::Array(items) => {
                let mut grown = items.borrow().to_vec();
                grown.extend(tail);
                Ok(Value::array(grown))
            }
            other => Err(self.type_error(other)),
        }
    }

    fn first(self, seq: &Value) -> EvalResult<Value> {
        let items = self.expect_seq(seq)?;
        Ok(items.into_iter().next().unwrap_or(Value::Null))
    }

    fn rest(self, seq: &Value) -> EvalResult<Value> {
        let items = self.expect_seq(seq)?;
        if items.len() < 2 {
            return Ok(Value::Null);
        }
        let rest = items[1..].to_vec();
        Ok(match seq {
            Value::List(_) => Value::list(rest),
            _ => Value::array(rest),
        })
    }

    fn concat(self, a: &Value, b: &Value) -> EvalResult<Value> {
        match (a, b) {
            (Value::Str(x), Value::Str(y)) => Ok(Value::str(format!("{x}{y}"))),
            (Value::List(_), Value::List(_)) | (Value::Array(_), Value::Array(_)) => {
                let tail = self.expect_seq(b)?;
                self.append(a, tail)
            }
            (Value::Str(_) | Value::List(_) | Value::Array(_), other) => {
                Err(self.type_error(other))
            }
            (other, _) => Err(self.type_error(other)),
        }
    }

    fn slurp(self, path: &Rc<str>, host: &mut dyn Host) -> EvalResult<Value> {
        match host.read_file(path) {
            Ok(contents) => {
                tracing::debug!(path = %path, bytes = contents.len(), "slurp");
                Ok(Value::str(contents))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(EvalError::FileNotFound(path.to_string()))
            }
            Err(e) => {
                tracing::debug!(path = %path, error = %e, "slurp failed");
                Err(EvalError::FileUnreadable(path.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CaptureHost;
    use crate::value::TypeTag;

    fn call(builtin: Builtin, args: &[Value]) -> EvalResult<Value> {
        builtin.call(args, &mut CaptureHost::new())
    }

    #[test]
    fn test_lookup_by_name() {
        for builtin in Builtin::ALL {
            assert_eq!(Builtin::lookup(builtin.name()), Some(builtin));
        }
        assert_eq!(Builtin::lookup("map"), None);
    }

    #[test]
    fn test_arity_is_checked() {
        let err = call(Builtin::Len, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Wrong number of args for len: got 0, expected 1");
        let err = call(Builtin::Push, &[Value::Null]).unwrap_err();
        assert_eq!(err.to_string(), "Wrong number of args for push: got 1, expected 2");
    }

    #[test]
    fn test_print_is_variadic() {
        let mut host = CaptureHost::new();
        let args = [Value::str("a"), Value::Int(1), Value::Null];
        assert_eq!(Builtin::Print.call(&args, &mut host).unwrap(), Value::Null);
        Builtin::Print.call(&[], &mut host).unwrap();
        assert_eq!(host.lines, vec!["a1null".to_string(), String::new()]);
    }

    #[test]
    fn test_cdr_keeps_sequence_kind() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let rest = call(Builtin::Cdr, &[list]).unwrap();
        assert_eq!(rest.type_tag(), TypeTag::List);
        assert_eq!(rest.to_string(), "[2, 3]");
        let single = Value::array(vec![Value::Int(1)]);
        assert_eq!(call(Builtin::Cdr, &[single]).unwrap(), Value::Null);
    }

    #[test]
    fn test_concat_type_errors() {
        let err = call(Builtin::Concat, &[Value::str("a"), Value::Int(1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type error: concat called with argument of type: INT"
        );
        let err = call(Builtin::Concat, &[Value::Bool(true), Value::str("a")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Type error: concat called with argument of type: BOOL"
        );
    }

    #[test]
    fn test_slurp_failures() {
        let mut host = CaptureHost::new();
        let err = Builtin::Slurp
            .call(&[Value::str("nope.txt")], &mut host)
            .unwrap_err();
        assert_eq!(err.to_string(), "File not found: nope.txt");
    }
}
