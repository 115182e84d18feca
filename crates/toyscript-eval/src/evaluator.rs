//! Tree-walking evaluator for ToyScript programs.

use std::rc::Rc;

use toyscript_types::ast::{AstList, InfixOperator, Node, NodeId, PrefixOperator};
use toyscript_types::region::Mark;
use toyscript_types::{Ast, Program, Region};

use crate::builtins::Builtin;
use crate::env::Env;
use crate::error::{EvalError, EvalResult};
use crate::host::{Host, StdHost};
use crate::value::{Function, Value};

/// Argument frames never outgrow this many live values.
const FRAME_RESERVE: usize = 1 << 20;

/// Evaluates programs against an [`Env`], doing I/O through a [`Host`].
pub struct Evaluator<H: Host = StdHost> {
    pub host: H,
    /// Argument values of every call in progress, innermost last.
    frames: Region<Value>,
}

impl Evaluator<StdHost> {
    pub fn new() -> Self {
        Self::with_host(StdHost)
    }
}

impl Default for Evaluator<StdHost> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Host> Evaluator<H> {
    pub fn with_host(host: H) -> Self {
        Self {
            host,
            frames: Region::with_reserve(FRAME_RESERVE),
        }
    }

    /// Number of argument values currently held by active calls.
    pub fn frame_len(&self) -> usize {
        self.frames.len()
    }

    // ══════════════════════════════════════════════════════════════════════
    // Programs
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate every statement of `program`, yielding the last value.
    /// Failures come back as [`Value::Error`].
    pub fn eval_program(&mut self, program: &Program, env: &Env) -> Value {
        match self.run(program, env) {
            Ok(value) => value,
            Err(e) => Value::Error(e.to_string()),
        }
    }

    /// Like [`eval_program`](Self::eval_program), keeping failures typed.
    pub fn run(&mut self, program: &Program, env: &Env) -> EvalResult<Value> {
        let ast = program.ast();
        tracing::debug!(
            statements = program.statements().len(),
            nodes = ast.node_count(),
            "eval: program"
        );
        let result = match self.eval_statements(ast, program.statements(), env) {
            Err(EvalError::Return(value)) => Ok(value),
            other => other,
        };
        if let Err(e) = &result {
            tracing::debug!(error = %e, "eval: program failed");
        }
        result
    }

    /// Statements of a block in `env`, in order. `return` is not unwrapped.
    fn eval_statements(&mut self, ast: &Rc<Ast>, list: AstList, env: &Env) -> EvalResult<Value> {
        let mut result = Value::Null;
        for id in ast.iter(list) {
            result = self.eval_node(ast, id, env)?;
        }
        Ok(result)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Nodes
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_node(&mut self, ast: &Rc<Ast>, id: NodeId, env: &Env) -> EvalResult<Value> {
        match ast.node(id) {
            Node::Program { statements } => self.eval_statements(ast, *statements, env),
            Node::ValBinding { name, value } => self.eval_binding(ast, name, *value, env, false),
            Node::VarBinding { name, value } => self.eval_binding(ast, name, *value, env, true),
            Node::Return { value } => {
                let value = self.eval_node(ast, *value, env)?;
                Err(EvalError::Return(value))
            }
            Node::While { condition, body } => self.eval_while(ast, *condition, *body, env),
            Node::Assign { target, value } => self.eval_assign(ast, *target, *value, env),
            Node::Identifier(name) => eval_identifier(name, env),
            Node::IntLiteral(n) => Ok(Value::Int(*n)),
            Node::BoolLiteral(b) => Ok(Value::Bool(*b)),
            Node::StringLiteral(s) => Ok(Value::str(s.as_str())),
            Node::NullLiteral => Ok(Value::Null),
            Node::ListLiteral { items } => {
                let mut values = Vec::with_capacity(items.len());
                for item in ast.iter(*items) {
                    values.push(self.eval_node(ast, item, env)?);
                }
                Ok(Value::array(values))
            }
            Node::FunctionLiteral { params, body } => Ok(make_closure(ast, *params, *body, env)),
            Node::PrefixOp { op, operand } => {
                let operand = self.eval_node(ast, *operand, env)?;
                apply_prefix(*op, &operand)
            }
            Node::InfixOp { left, op, right } => {
                let left = self.eval_node(ast, *left, env)?;
                let right = self.eval_node(ast, *right, env)?;
                apply_infix(*op, &left, &right)
            }
            Node::Conditional {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_node(ast, *condition, env)?;
                if condition.is_truthy() {
                    self.eval_statements(ast, *consequence, env)
                } else if let Some(alternative) = alternative {
                    self.eval_statements(ast, *alternative, env)
                } else {
                    Ok(Value::Null)
                }
            }
            Node::Call { callee, args } => self.eval_call(ast, *callee, *args, env),
            Node::Index { base, index } => {
                let base = self.eval_node(ast, *base, env)?;
                let index = self.eval_node(ast, *index, env)?;
                read_index(&base, &index)
            }
        }
    }

    // ── Statements ───────────────────────────────────────────────────────

    fn eval_binding(
        &mut self,
        ast: &Rc<Ast>,
        name: &str,
        value: NodeId,
        env: &Env,
        mutable: bool,
    ) -> EvalResult<Value> {
        let value = self.eval_node(ast, value, env)?;
        env.declare(name, value.clone(), mutable)?;
        Ok(value)
    }

    /// One child scope serves every iteration.
    fn eval_while(
        &mut self,
        ast: &Rc<Ast>,
        condition: NodeId,
        body: AstList,
        env: &Env,
    ) -> EvalResult<Value> {
        let scope = env.child();
        loop {
            let test = self.eval_node(ast, condition, &scope)?;
            if !test.is_truthy() {
                break;
            }
            self.eval_statements(ast, body, &scope)?;
        }
        Ok(Value::Null)
    }

    fn eval_assign(
        &mut self,
        ast: &Rc<Ast>,
        target: NodeId,
        value: NodeId,
        env: &Env,
    ) -> EvalResult<Value> {
        match ast.node(target) {
            Node::Identifier(name) => {
                let value = self.eval_node(ast, value, env)?;
                env.assign(name, value)
            }
            Node::Index { base, index } => {
                let base = self.eval_node(ast, *base, env)?;
                let index = self.eval_node(ast, *index, env)?;
                let value = self.eval_node(ast, value, env)?;
                write_index(&base, &index, value)
            }
            other => Err(EvalError::InvalidTarget(other.kind_name())),
        }
    }

    // ── Calls ────────────────────────────────────────────────────────────

    fn eval_call(
        &mut self,
        ast: &Rc<Ast>,
        callee: NodeId,
        args: AstList,
        env: &Env,
    ) -> EvalResult<Value> {
        let callee = self.eval_node(ast, callee, env)?;
        if !matches!(callee, Value::Function(_) | Value::Builtin(_)) {
            return Err(EvalError::NotCallable(callee.type_tag()));
        }
        let mark = self.frames.checkpoint();
        let result = self.call_in_frame(ast, &callee, args, env, mark);
        self.frames.rollback(mark);
        result
    }

    /// Push the arguments above `mark` and dispatch. The caller rolls the
    /// frame back whatever the outcome.
    fn call_in_frame(
        &mut self,
        ast: &Rc<Ast>,
        callee: &Value,
        args: AstList,
        env: &Env,
        mark: Mark,
    ) -> EvalResult<Value> {
        for arg in ast.iter(args) {
            let value = self.eval_node(ast, arg, env)?;
            self.frames.alloc(value);
        }
        match callee {
            Value::Builtin(builtin) => builtin.call(self.frames.since(mark), &mut self.host),
            Value::Function(func) => self.apply(func, mark),
            other => Err(EvalError::NotCallable(other.type_tag())),
        }
    }

    /// Each nested call recurses on the native stack; a few thousand levels
    /// overflow a 2 MiB thread in debug builds.
    fn apply(&mut self, func: &Rc<Function>, mark: Mark) -> EvalResult<Value> {
        let args = self.frames.since(mark);
        if args.len() != func.params.len() {
            return Err(EvalError::Arity {
                got: args.len(),
                expected: func.params.len(),
            });
        }
        let scope = func.env.child();
        for (name, value) in func.params.iter().zip(args) {
            scope.declare(name, value.clone(), true)?;
        }
        tracing::trace!(params = ?func.params, depth = scope.depth(), "eval: call");
        match self.eval_statements(&func.ast, func.body, &scope) {
            Err(EvalError::Return(value)) => Ok(value),
            other => other,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Leaf Rules
// ══════════════════════════════════════════════════════════════════════════

/// Bindings shadow builtins.
fn eval_identifier(name: &str, env: &Env) -> EvalResult<Value> {
    env.lookup(name)
        .or_else(|| Builtin::lookup(name).map(Value::Builtin))
        .ok_or_else(|| EvalError::NameNotFound(name.to_string()))
}

fn make_closure(ast: &Rc<Ast>, params: AstList, body: AstList, env: &Env) -> Value {
    let params = ast
        .iter(params)
        .filter_map(|id| match ast.node(id) {
            Node::Identifier(name) => Some(name.clone()),
            _ => None,
        })
        .collect();
    Value::Function(Rc::new(Function {
        ast: Rc::clone(ast),
        params,
        body,
        env: env.clone(),
    }))
}

// ── Operators ────────────────────────────────────────────────────────────

fn apply_prefix(op: PrefixOperator, operand: &Value) -> EvalResult<Value> {
    match (op, operand) {
        (PrefixOperator::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (PrefixOperator::Not, Value::Int(n)) => Ok(Value::Bool(*n == 0)),
        (PrefixOperator::Not, Value::Null) => Ok(Value::Bool(false)),
        (PrefixOperator::Negate, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        _ => Err(EvalError::InvalidPrefix {
            op: op.as_str(),
            operand: operand.type_tag(),
        }),
    }
}

fn apply_infix(op: InfixOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    let (lt, rt) = (left.type_tag(), right.type_tag());
    if lt != rt {
        return Err(EvalError::TypeMismatch {
            left: lt,
            op: op.as_str(),
            right: rt,
        });
    }
    let invalid = || EvalError::InvalidInfix {
        left: lt,
        op: op.as_str(),
        right: rt,
    };
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_op(op, *a, *b),
        (Value::Str(a), Value::Str(b)) => match op {
            InfixOperator::Add => Ok(Value::str(format!("{a}{b}"))),
            _ => equality(op, a == b).ok_or_else(invalid),
        },
        (Value::Bool(a), Value::Bool(b)) => equality(op, a == b).ok_or_else(invalid),
        (Value::Null, Value::Null) => equality(op, true).ok_or_else(invalid),
        (Value::Type(a), Value::Type(b)) => equality(op, a == b).ok_or_else(invalid),
        // The left list grows in place; every handle to it sees the new tail.
        (Value::List(a), Value::List(b)) if op == InfixOperator::Add => {
            let tail = b.borrow().clone();
            a.borrow_mut().extend(tail);
            Ok(left.clone())
        }
        (Value::Array(a), Value::Array(b)) if op == InfixOperator::Add => {
            let mut items = a.borrow().to_vec();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::array(items))
        }
        _ => Err(invalid()),
    }
}

fn int_op(op: InfixOperator, a: i64, b: i64) -> EvalResult<Value> {
    let value = match op {
        InfixOperator::Add => Value::Int(a.wrapping_add(b)),
        InfixOperator::Sub => Value::Int(a.wrapping_sub(b)),
        InfixOperator::Mul => Value::Int(a.wrapping_mul(b)),
        InfixOperator::Div | InfixOperator::Rem if b == 0 => {
            return Err(EvalError::DivisionByZero)
        }
        InfixOperator::Div => Value::Int(a.wrapping_div(b)),
        InfixOperator::Rem => Value::Int(a.wrapping_rem(b)),
        InfixOperator::Eq => Value::Bool(a == b),
        InfixOperator::NotEq => Value::Bool(a != b),
        InfixOperator::Greater => Value::Bool(a > b),
        InfixOperator::Less => Value::Bool(a < b),
    };
    Ok(value)
}

fn equality(op: InfixOperator, equal: bool) -> Option<Value> {
    match op {
        InfixOperator::Eq => Some(Value::Bool(equal)),
        InfixOperator::NotEq => Some(Value::Bool(!equal)),
        _ => None,
    }
}

// ── Indexing ─────────────────────────────────────────────────────────────

fn index_of(base: &Value, index: &Value) -> EvalResult<i64> {
    if !matches!(base, Value::List(_) | Value::Array(_)) {
        return Err(EvalError::NotIndexable(base.type_tag()));
    }
    match index {
        Value::Int(i) => Ok(*i),
        other => Err(EvalError::InvalidIndex(other.type_tag())),
    }
}

/// Out-of-range reads, negative indices included, yield `null`.
fn read_index(base: &Value, index: &Value) -> EvalResult<Value> {
    let i = index_of(base, index)?;
    let at = usize::try_from(i).ok();
    let element = match base {
        Value::List(items) => at.and_then(|at| items.borrow().get(at).cloned()),
        Value::Array(items) => at.and_then(|at| items.borrow().get(at).cloned()),
        _ => None,
    };
    Ok(element.unwrap_or(Value::Null))
}

/// In-place element write; the binding's mutability is not consulted.
fn write_index(base: &Value, index: &Value, value: Value) -> EvalResult<Value> {
    let i = index_of(base, index)?;
    match base {
        Value::List(items) => write_slot(&mut items.borrow_mut(), i, value),
        Value::Array(items) => write_slot(&mut items.borrow_mut(), i, value),
        other => Err(EvalError::NotIndexable(other.type_tag())),
    }
}

fn write_slot(slots: &mut [Value], i: i64, value: Value) -> EvalResult<Value> {
    let max = slots.len() as i64 - 1;
    match usize::try_from(i).ok().and_then(|at| slots.get_mut(at)) {
        Some(slot) => {
            *slot = value.clone();
            Ok(value)
        }
        None => Err(EvalError::OutOfBounds { max, index: i }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TypeTag;

    #[test]
    fn test_int_division_by_zero() {
        let err = int_op(InfixOperator::Div, 1, 0).unwrap_err();
        assert_eq!(err.to_string(), "Division by zero");
        assert!(int_op(InfixOperator::Rem, 1, 0).is_err());
        assert_eq!(int_op(InfixOperator::Div, -7, 2).unwrap(), Value::Int(-3));
        assert_eq!(
            int_op(InfixOperator::Div, i64::MIN, -1).unwrap(),
            Value::Int(i64::MIN)
        );
    }

    #[test]
    fn test_prefix_rules() {
        assert_eq!(
            apply_prefix(PrefixOperator::Not, &Value::Int(0)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            apply_prefix(PrefixOperator::Not, &Value::Null).unwrap(),
            Value::Bool(false)
        );
        let err = apply_prefix(PrefixOperator::Negate, &Value::Bool(true)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation: -BOOL");
        let err = apply_prefix(PrefixOperator::Not, &Value::str("s")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation: !STR");
    }

    #[test]
    fn test_infix_type_rules() {
        let err = apply_infix(InfixOperator::Add, &Value::Int(5), &Value::Bool(false)).unwrap_err();
        assert_eq!(err.to_string(), "Invalid types in operation: INT+BOOL");
        let err =
            apply_infix(InfixOperator::Less, &Value::str("a"), &Value::str("b")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation: STR<STR");
        let types_equal = apply_infix(
            InfixOperator::Eq,
            &Value::Type(TypeTag::Int),
            &Value::Type(TypeTag::Int),
        );
        assert_eq!(types_equal.unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_write_slot_bounds() {
        let mut slots = vec![Value::Int(1), Value::Int(2)];
        assert_eq!(write_slot(&mut slots, 1, Value::Int(9)).unwrap(), Value::Int(9));
        assert_eq!(slots[1], Value::Int(9));
        let err = write_slot(&mut slots, 2, Value::Null).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Out of bounds assignment: max index is 1, attempted to access 2"
        );
        assert!(write_slot(&mut slots, -1, Value::Null).is_err());
    }
}
