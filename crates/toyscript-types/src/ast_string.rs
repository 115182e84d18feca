//! Canonical text rendering of an AST.
//!
//! The output is valid ToyScript, so parsing it again reproduces the same
//! text. Operators are fully parenthesised and carry no inner spaces:
//! `-a * b` renders as `((-a)*b)`.

use std::fmt::Write;

use crate::ast::{Ast, AstList, Node, NodeId, Program};

/// Render a whole program, one statement per line.
pub fn ast_string(program: &Program) -> String {
    let mut out = String::new();
    Printer {
        ast: program.ast(),
        out: &mut out,
    }
    .list(program.statements(), ";\n");
    out
}

impl Ast {
    /// Render a single node in canonical form.
    pub fn render(&self, node: NodeId) -> String {
        let mut out = String::new();
        Printer {
            ast: self,
            out: &mut out,
        }
        .node(node);
        out
    }
}

struct Printer<'a> {
    ast: &'a Ast,
    out: &'a mut String,
}

impl Printer<'_> {
    fn node(&mut self, id: NodeId) {
        match self.ast.node(id) {
            Node::Program { statements } => self.list(*statements, ";\n"),
            Node::ValBinding { name, value } => {
                let _ = write!(self.out, "val {name} = ");
                self.node(*value);
            }
            Node::VarBinding { name, value } => {
                let _ = write!(self.out, "var {name} = ");
                self.node(*value);
            }
            Node::Return { value } => {
                self.out.push_str("return ");
                self.node(*value);
            }
            Node::While { condition, body } => {
                self.out.push_str("while (");
                self.node(*condition);
                self.out.push_str(") ");
                self.block(*body);
            }
            Node::Assign { target, value } => {
                self.out.push('(');
                self.node(*target);
                self.out.push_str(" = ");
                self.node(*value);
                self.out.push(')');
            }
            Node::Identifier(name) => self.out.push_str(name),
            Node::IntLiteral(value) => {
                let _ = write!(self.out, "{value}");
            }
            Node::BoolLiteral(value) => {
                let _ = write!(self.out, "{value}");
            }
            Node::StringLiteral(value) => self.string(value),
            Node::NullLiteral => self.out.push_str("null"),
            Node::ListLiteral { items } => {
                self.out.push('[');
                self.list(*items, ", ");
                self.out.push(']');
            }
            Node::FunctionLiteral { params, body } => {
                self.out.push_str("fn(");
                self.list(*params, ", ");
                self.out.push_str(") ");
                self.block(*body);
            }
            Node::PrefixOp { op, operand } => {
                let _ = write!(self.out, "({op}");
                self.node(*operand);
                self.out.push(')');
            }
            Node::InfixOp { left, op, right } => {
                self.out.push('(');
                self.node(*left);
                self.out.push_str(op.as_str());
                self.node(*right);
                self.out.push(')');
            }
            Node::Conditional {
                condition,
                consequence,
                alternative,
            } => {
                self.out.push_str("if (");
                self.node(*condition);
                self.out.push_str(") ");
                self.block(*consequence);
                if let Some(alternative) = alternative {
                    self.out.push_str(" else ");
                    self.block(*alternative);
                }
            }
            Node::Call { callee, args } => {
                self.node(*callee);
                self.out.push('(');
                self.list(*args, ", ");
                self.out.push(')');
            }
            Node::Index { base, index } => {
                self.out.push('(');
                self.node(*base);
                self.out.push('[');
                self.node(*index);
                self.out.push_str("])");
            }
        }
    }

    fn list(&mut self, list: AstList, separator: &str) {
        for (i, id) in self.ast.iter(list).enumerate() {
            if i > 0 {
                self.out.push_str(separator);
            }
            self.node(id);
        }
    }

    fn block(&mut self, body: AstList) {
        self.out.push('{');
        self.list(body, "; ");
        self.out.push('}');
    }

    fn string(&mut self, value: &str) {
        self.out.push('"');
        for ch in value.chars() {
            match ch {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                _ => self.out.push(ch),
            }
        }
        self.out.push('"');
    }
}
