//! Core parser infrastructure: token cursor, error reporting, rollback.

use toyscript_lexer::{Token, TokenKind, TokenSource};
use toyscript_types::ast::{Ast, AstList, Node};
use toyscript_types::{ErrorCode, ParseError, ParseErrors, Program, SourceFile, Span};

/// Binding power of an operator token, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Assignment,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl Precedence {
    /// Precedence of `kind` in infix position.
    pub fn of(kind: &TokenKind) -> Self {
        match kind {
            TokenKind::Assign => Self::Assignment,
            TokenKind::Eq | TokenKind::NotEq => Self::Equals,
            TokenKind::Less | TokenKind::Greater => Self::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Self::Sum,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Self::Product,
            TokenKind::LParen => Self::Call,
            TokenKind::LBracket => Self::Index,
            _ => Self::Lowest,
        }
    }
}

/// The ToyScript parser.
///
/// Pulls tokens from a [`TokenSource`] with one token of lookahead and
/// builds nodes into its own [`Ast`]. The first error ends the parse.
///
/// Every parse routine starts with `cur` on the first token of its
/// construct and returns with `cur` on the last one.
pub struct Parser<'src, S> {
    tokens: S,
    pub(crate) cur: Token,
    pub(crate) peek: Token,
    source_file: &'src SourceFile,
    errors: ParseErrors,
    pub(crate) ast: Ast,
}

/// Result of parsing: a program when there were no errors.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Option<Program>,
    pub errors: ParseErrors,
}

impl ParseResult {
    pub fn into_result(self) -> Result<Program, ParseErrors> {
        match self.program {
            Some(program) if !self.errors.has_errors() => Ok(program),
            _ => Err(self.errors),
        }
    }
}

impl<'src, S: TokenSource> Parser<'src, S> {
    pub fn new(mut tokens: S, source_file: &'src SourceFile) -> Self {
        let cur = tokens.next_token();
        let peek = tokens.next_token();
        Self {
            tokens,
            cur,
            peek,
            source_file,
            errors: ParseErrors::empty(),
            ast: Ast::new(),
        }
    }

    /// Parse the whole token stream.
    pub fn parse(mut self) -> ParseResult {
        let mut statements = AstList::default();
        while self.cur.kind != TokenKind::Eof {
            match self.parse_statement() {
                Some(stmt) if !self.errors.has_errors() => self.ast.push(&mut statements, stmt),
                _ => break,
            }
            self.advance();
        }

        if self.errors.has_errors() {
            tracing::debug!(errors = self.errors.total_errors, "parser: aborted");
            return ParseResult {
                program: None,
                errors: self.errors,
            };
        }

        let root = self.ast.alloc(Node::Program { statements });
        let (nodes, cells) = self.ast.stats();
        tracing::debug!(
            statements = statements.len(),
            nodes = nodes.len,
            cells = cells.len,
            "parser: finished"
        );
        ParseResult {
            program: Some(Program::new(self.ast, root)),
            errors: self.errors,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    pub(crate) fn advance(&mut self) {
        let next = self.tokens.next_token();
        self.cur = std::mem::replace(&mut self.peek, next);
    }

    pub(crate) fn cur_is(&self, kind: &TokenKind) -> bool {
        &self.cur.kind == kind
    }

    pub(crate) fn peek_is(&self, kind: &TokenKind) -> bool {
        &self.peek.kind == kind
    }

    /// Advance if the lookahead matches, else record an error.
    pub(crate) fn expect_peek(&mut self, expected: TokenKind, context: &str) -> Option<()> {
        if self.peek_is(&expected) {
            self.advance();
            Some(())
        } else {
            let message = format!(
                "expected '{expected}' {context}, got '{}'",
                self.peek.kind
            );
            self.error_at(ErrorCode::UNEXPECTED_TOKEN, message, self.peek.span);
            None
        }
    }

    /// Consume an optional `;` after a statement.
    pub(crate) fn eat_semicolon(&mut self) {
        if self.peek_is(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    // ── Rollback ──────────────────────────────────────────────────────────────

    /// Run a production that may fail partway.
    ///
    /// On failure everything it allocated in the AST is discarded.
    pub(crate) fn speculate<T>(&mut self, production: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let mark = self.ast.checkpoint();
        let result = production(self);
        if result.is_none() {
            self.ast.rollback(mark);
        }
        result
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        self.error_at(code, message, self.cur.span);
    }

    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.line).unwrap_or("");
        let error = ParseError::new(&self.source_file.name, code, message, span, source_line);
        tracing::debug!(%error, "parser: error");
        self.errors.push(error);
    }
}
