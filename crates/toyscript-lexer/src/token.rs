//! Token types for the ToyScript lexer.

use std::fmt;
use toyscript_types::Span;

/// Reserved words. `NIL` is an alias of `null`.
pub const KEYWORDS: &[&str] = &[
    "val", "var", "fn", "return", "if", "else", "while", "true", "false", "null", "NIL",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The token's literal text as it would appear in source.
    pub fn literal(&self) -> String {
        self.kind.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input.
    Eof,
    /// A character or construct the lexer cannot accept; carries a description.
    Illegal(String),

    // ── Separators ───────────────────────────────────────────
    Semicolon,
    Comma,

    // ── Operators ────────────────────────────────────────────
    Bang,
    Star,
    Slash,
    Percent,
    Greater,
    Less,
    Plus,
    Minus,
    Assign,
    Eq,
    NotEq,

    // ── Delimiters ───────────────────────────────────────────
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // ── Literals & names ─────────────────────────────────────
    /// Decimal digits; range-checked by the parser.
    Int(String),
    /// String contents with escapes already resolved.
    Str(String),
    Identifier(String),

    // ── Keywords ─────────────────────────────────────────────
    Val,
    Var,
    Fn,
    Return,
    If,
    Else,
    While,
    True,
    False,
    Null,
}

impl TokenKind {
    /// Look up a keyword by its spelling.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        Some(match word {
            "val" => TokenKind::Val,
            "var" => TokenKind::Var,
            "fn" => TokenKind::Fn,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" | "NIL" => TokenKind::Null,
            _ => return None,
        })
    }

    /// Upper-case category name used in parser diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Illegal(_) => "ILLEGAL",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Bang => "BANG",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Percent => "MOD",
            TokenKind::Greater => "GT",
            TokenKind::Less => "LT",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Eq => "EQ",
            TokenKind::NotEq => "NOT_EQ",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Int(_) => "INT",
            TokenKind::Str(_) => "STRING",
            TokenKind::Identifier(_) => "IDENT",
            TokenKind::Val => "VAL",
            TokenKind::Var => "VAR",
            TokenKind::Fn => "FN",
            TokenKind::Return => "RETURN",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Eof => "end of input",
            TokenKind::Illegal(text) => return f.write_str(text),
            TokenKind::Int(digits) => return f.write_str(digits),
            TokenKind::Str(value) => return write!(f, "\"{value}\""),
            TokenKind::Identifier(name) => return f.write_str(name),
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Bang => "!",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Greater => ">",
            TokenKind::Less => "<",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Assign => "=",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Val => "val",
            TokenKind::Var => "var",
            TokenKind::Fn => "fn",
            TokenKind::Return => "return",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
        };
        f.write_str(text)
    }
}
