//! Statement and block parsing.

use toyscript_lexer::{TokenKind, TokenSource};
use toyscript_types::ast::{AstList, Node, NodeId};
use toyscript_types::ErrorCode;

use crate::parser::{Parser, Precedence};

impl<S: TokenSource> Parser<'_, S> {
    /// Dispatch on the leading keyword.
    pub(crate) fn parse_statement(&mut self) -> Option<NodeId> {
        match self.cur.kind {
            TokenKind::Val => self.parse_binding(false),
            TokenKind::Var => self.parse_binding(true),
            TokenKind::Return => self.parse_return(),
            TokenKind::While => self.parse_while(),
            _ => self.parse_expression_statement(),
        }
    }

    /// `{ stmt* }`, entered with `cur` on the `{`.
    pub(crate) fn parse_block(&mut self) -> Option<AstList> {
        self.speculate(|p| {
            let mut body = AstList::default();
            p.advance();
            while !p.cur_is(&TokenKind::RBrace) {
                if p.cur_is(&TokenKind::Eof) {
                    p.error_at_current(
                        ErrorCode::UNCLOSED_BLOCK,
                        "unclosed block: expected '}' before end of input",
                    );
                    return None;
                }
                let stmt = p.parse_statement()?;
                p.ast.push(&mut body, stmt);
                p.advance();
            }
            Some(body)
        })
    }

    /// `val|var IDENT = expr [;]`
    fn parse_binding(&mut self, mutable: bool) -> Option<NodeId> {
        self.speculate(|p| {
            let keyword = if mutable { "var" } else { "val" };
            let TokenKind::Identifier(name) = &p.peek.kind else {
                let message = format!("expected name after '{keyword}', got '{}'", p.peek.kind);
                p.error_at(ErrorCode::UNEXPECTED_TOKEN, message, p.peek.span);
                return None;
            };
            let name = name.clone();
            p.advance();
            p.expect_peek(TokenKind::Assign, &format!("after '{keyword} {name}'"))?;
            p.advance();
            let value = p.parse_expression(Precedence::Lowest)?;
            p.eat_semicolon();
            let node = if mutable {
                Node::VarBinding { name, value }
            } else {
                Node::ValBinding { name, value }
            };
            Some(p.ast.alloc(node))
        })
    }

    /// `return [expr] [;]`; a bare `return` yields `null`.
    fn parse_return(&mut self) -> Option<NodeId> {
        self.speculate(|p| {
            let value = match p.peek.kind {
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => {
                    p.ast.alloc(Node::NullLiteral)
                }
                _ => {
                    p.advance();
                    p.parse_expression(Precedence::Lowest)?
                }
            };
            p.eat_semicolon();
            Some(p.ast.alloc(Node::Return { value }))
        })
    }

    /// `while ( cond ) { body } [;]`
    fn parse_while(&mut self) -> Option<NodeId> {
        self.speculate(|p| {
            p.expect_peek(TokenKind::LParen, "after 'while'")?;
            p.advance();
            let condition = p.parse_expression(Precedence::Lowest)?;
            p.expect_peek(TokenKind::RParen, "after condition")?;
            p.expect_peek(TokenKind::LBrace, "before 'while' body")?;
            let body = p.parse_block()?;
            p.eat_semicolon();
            Some(p.ast.alloc(Node::While { condition, body }))
        })
    }

    fn parse_expression_statement(&mut self) -> Option<NodeId> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.eat_semicolon();
        Some(expr)
    }
}
