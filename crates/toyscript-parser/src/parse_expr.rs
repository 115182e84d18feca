//! Expression parsing by precedence climbing.
//!
//! Precedence (lowest → highest):
//! 1. `=` (right-associative)
//! 2. `==`, `!=`
//! 3. `<`, `>`
//! 4. `+`, `-`
//! 5. `*`, `/`, `%`
//! 6. prefix `!`, `-`
//! 7. call `f(...)`
//! 8. index `a[...]`

use toyscript_lexer::{TokenKind, TokenSource};
use toyscript_types::ast::{AstList, InfixOperator, Node, NodeId, PrefixOperator};
use toyscript_types::ErrorCode;

use crate::parser::{Parser, Precedence};

impl<S: TokenSource> Parser<'_, S> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression whose operators all bind tighter than `min`.
    pub(crate) fn parse_expression(&mut self, min: Precedence) -> Option<NodeId> {
        let mut left = self.parse_prefix()?;
        while !self.peek_is(&TokenKind::Semicolon) && min < Precedence::of(&self.peek.kind) {
            self.advance();
            left = self.parse_infix(left)?;
        }
        Some(left)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Prefix Position
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_prefix(&mut self) -> Option<NodeId> {
        let node = match &self.cur.kind {
            TokenKind::Int(digits) => match digits.parse::<i64>() {
                Ok(value) => Node::IntLiteral(value),
                Err(_) => {
                    let message = format!("integer literal out of range: {digits}");
                    self.error_at_current(ErrorCode::INTEGER_OVERFLOW, message);
                    return None;
                }
            },
            TokenKind::Str(value) => Node::StringLiteral(value.clone()),
            TokenKind::Identifier(name) => Node::Identifier(name.clone()),
            TokenKind::True => Node::BoolLiteral(true),
            TokenKind::False => Node::BoolLiteral(false),
            TokenKind::Null => Node::NullLiteral,
            TokenKind::Bang => return self.parse_prefix_op(PrefixOperator::Not),
            TokenKind::Minus => return self.parse_prefix_op(PrefixOperator::Negate),
            TokenKind::LParen => return self.parse_grouped(),
            TokenKind::LBracket => return self.parse_list_literal(),
            TokenKind::Fn => return self.parse_function(),
            TokenKind::If => return self.parse_conditional(),
            TokenKind::Illegal(text) => {
                let message = format!("illegal token: {text}");
                self.error_at_current(ErrorCode::ILLEGAL_TOKEN, message);
                return None;
            }
            other => {
                let message = format!("prefix not recognized: {}", other.name());
                self.error_at_current(ErrorCode::PREFIX_NOT_RECOGNIZED, message);
                return None;
            }
        };
        Some(self.ast.alloc(node))
    }

    fn parse_prefix_op(&mut self, op: PrefixOperator) -> Option<NodeId> {
        self.advance();
        let operand = self.parse_expression(Precedence::Prefix)?;
        Some(self.ast.alloc(Node::PrefixOp { op, operand }))
    }

    /// `( expr )`; grouping produces no node of its own.
    fn parse_grouped(&mut self) -> Option<NodeId> {
        self.advance();
        let inner = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen, "to close group")?;
        Some(inner)
    }

    fn parse_list_literal(&mut self) -> Option<NodeId> {
        let items = self.parse_many(TokenKind::RBracket)?;
        Some(self.ast.alloc(Node::ListLiteral { items }))
    }

    /// Comma-separated expressions after the opening token, up to `end`.
    pub(crate) fn parse_many(&mut self, end: TokenKind) -> Option<AstList> {
        self.speculate(|p| {
            let mut items = AstList::default();
            if p.peek_is(&end) {
                p.advance();
                return Some(items);
            }
            p.advance();
            let first = p.parse_expression(Precedence::Lowest)?;
            p.ast.push(&mut items, first);
            while p.peek_is(&TokenKind::Comma) {
                p.advance();
                p.advance();
                let item = p.parse_expression(Precedence::Lowest)?;
                p.ast.push(&mut items, item);
            }
            p.expect_peek(end, "to close list")?;
            Some(items)
        })
    }

    /// `fn ( params ) { body }`
    fn parse_function(&mut self) -> Option<NodeId> {
        self.speculate(|p| {
            p.expect_peek(TokenKind::LParen, "after 'fn'")?;
            let params = p.parse_params()?;
            p.expect_peek(TokenKind::LBrace, "before function body")?;
            let body = p.parse_block()?;
            Some(p.ast.alloc(Node::FunctionLiteral { params, body }))
        })
    }

    fn parse_params(&mut self) -> Option<AstList> {
        self.speculate(|p| {
            let mut params = AstList::default();
            if p.peek_is(&TokenKind::RParen) {
                p.advance();
                return Some(params);
            }
            loop {
                p.advance();
                let TokenKind::Identifier(name) = &p.cur.kind else {
                    let message = format!("expected parameter name, got '{}'", p.cur.kind);
                    p.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message);
                    return None;
                };
                let param = p.ast.alloc(Node::Identifier(name.clone()));
                p.ast.push(&mut params, param);
                if !p.peek_is(&TokenKind::Comma) {
                    break;
                }
                p.advance();
            }
            p.expect_peek(TokenKind::RParen, "after parameters")?;
            Some(params)
        })
    }

    /// `if ( cond ) { ... } [else { ... }]`
    fn parse_conditional(&mut self) -> Option<NodeId> {
        self.speculate(|p| {
            p.expect_peek(TokenKind::LParen, "after 'if'")?;
            p.advance();
            let condition = p.parse_expression(Precedence::Lowest)?;
            p.expect_peek(TokenKind::RParen, "after condition")?;
            p.expect_peek(TokenKind::LBrace, "before 'if' body")?;
            let consequence = p.parse_block()?;
            let alternative = if p.peek_is(&TokenKind::Else) {
                p.advance();
                p.expect_peek(TokenKind::LBrace, "after 'else'")?;
                Some(p.parse_block()?)
            } else {
                None
            };
            Some(p.ast.alloc(Node::Conditional {
                condition,
                consequence,
                alternative,
            }))
        })
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Infix Position
    // ══════════════════════════════════════════════════════════════════════════

    /// Apply the infix rule for `cur` to an already-parsed left operand.
    fn parse_infix(&mut self, left: NodeId) -> Option<NodeId> {
        let op = match self.cur.kind {
            TokenKind::LParen => return self.parse_call(left),
            TokenKind::LBracket => return self.parse_index(left),
            TokenKind::Assign => return self.parse_assignment(left),
            TokenKind::Plus => InfixOperator::Add,
            TokenKind::Minus => InfixOperator::Sub,
            TokenKind::Star => InfixOperator::Mul,
            TokenKind::Slash => InfixOperator::Div,
            TokenKind::Percent => InfixOperator::Rem,
            TokenKind::Eq => InfixOperator::Eq,
            TokenKind::NotEq => InfixOperator::NotEq,
            TokenKind::Greater => InfixOperator::Greater,
            TokenKind::Less => InfixOperator::Less,
            _ => return Some(left),
        };
        let precedence = Precedence::of(&self.cur.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(self.ast.alloc(Node::InfixOp { left, op, right }))
    }

    fn parse_call(&mut self, callee: NodeId) -> Option<NodeId> {
        self.speculate(|p| {
            let args = p.parse_many(TokenKind::RParen)?;
            Some(p.ast.alloc(Node::Call { callee, args }))
        })
    }

    fn parse_index(&mut self, base: NodeId) -> Option<NodeId> {
        self.speculate(|p| {
            p.advance();
            let index = p.parse_expression(Precedence::Lowest)?;
            p.expect_peek(TokenKind::RBracket, "to close index")?;
            Some(p.ast.alloc(Node::Index { base, index }))
        })
    }

    /// `target = value`, right-associative.
    fn parse_assignment(&mut self, target: NodeId) -> Option<NodeId> {
        if !matches!(self.ast.node(target), Node::Identifier(_) | Node::Index { .. }) {
            let message = format!("invalid assignment target: {}", self.ast.render(target));
            self.error_at_current(ErrorCode::INVALID_ASSIGNMENT_TARGET, message);
            return None;
        }
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(self.ast.alloc(Node::Assign { target, value }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toyscript_lexer::Lexer;
    use toyscript_types::SourceFile;

    fn parser(sf: &SourceFile) -> Parser<'_, Lexer<'_>> {
        Parser::new(Lexer::new(sf), sf)
    }

    #[test]
    fn test_unclosed_list_rolls_back_items() {
        let sf = SourceFile::new("test.ts", "[1, 2, 3");
        let mut p = parser(&sf);
        assert!(p.parse_expression(Precedence::Lowest).is_none());
        assert_eq!(p.ast.node_count(), 0);
        assert_eq!(p.ast.cell_count(), 0);
    }

    #[test]
    fn test_failed_call_keeps_callee_only() {
        let sf = SourceFile::new("test.ts", "f(1, 2");
        let mut p = parser(&sf);
        assert!(p.parse_expression(Precedence::Lowest).is_none());
        assert_eq!(p.ast.node_count(), 1);
        assert_eq!(p.ast.cell_count(), 0);
    }

    #[test]
    fn test_bad_parameter_discards_function() {
        let sf = SourceFile::new("test.ts", "fn(a, 1) { a }");
        let mut p = parser(&sf);
        assert!(p.parse_expression(Precedence::Lowest).is_none());
        assert_eq!(p.ast.node_count(), 0);
        assert_eq!(p.ast.cell_count(), 0);
    }

    #[test]
    fn test_function_keeps_all_nodes() {
        let sf = SourceFile::new("test.ts", "fn(a) { a }");
        let mut p = parser(&sf);
        let id = p.parse_expression(Precedence::Lowest).unwrap();
        assert_eq!(p.ast.node_count(), 3);
        assert_eq!(p.ast.cell_count(), 2);
        assert_eq!(p.ast.render(id), "fn(a) {a}");
    }
}
