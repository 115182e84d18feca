//! Character-level scanner producing one token at a time.
//!
//! - Whitespace is space, tab, CR and LF; `#` comments run to end of line
//! - Identifiers may contain `?` after the first character
//! - Inside strings `\n` is a newline; any other escaped character is kept as is
//! - Anything unrecognised becomes an [`TokenKind::Illegal`] token; the parser
//!   decides what to do with it

use toyscript_types::{SourceFile, Span};

use crate::token::{Token, TokenKind};

/// A producer of tokens, pulled one at a time by the parser.
///
/// After the input is exhausted every call returns an `Eof` token.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

/// The ToyScript lexer.
pub struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: u32,
    col: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self::for_str(&source_file.source)
    }

    /// Lex a bare string with no file attached.
    pub fn for_str(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Drain the whole input, including the final `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_is(&self, expected: char) -> bool {
        self.peek() == Some(expected)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn span_from(&self, line: u32, col: u32) -> Span {
        Span::new(line, col, self.line, self.col.saturating_sub(1).max(1))
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan(&mut self) -> Token {
        self.skip_trivia();
        let (line, col) = (self.line, self.col);
        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::point(line, col));
        };

        let kind = match ch {
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '>' => TokenKind::Greater,
            '<' => TokenKind::Less,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '!' if self.peek_is('=') => {
                self.advance();
                TokenKind::NotEq
            }
            '!' => TokenKind::Bang,
            '=' if self.peek_is('=') => {
                self.advance();
                TokenKind::Eq
            }
            '=' => TokenKind::Assign,
            '"' => self.scan_string(),
            c if c.is_ascii_digit() => self.scan_int(),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_word(),
            other => TokenKind::Illegal(other.to_string()),
        };
        Token::new(kind, self.span_from(line, col))
    }

    /// Digits after the first one, which the caller already consumed.
    fn scan_int(&mut self) -> TokenKind {
        let start = self.pos - 1;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        TokenKind::Int(self.source[start..self.pos].to_string())
    }

    fn scan_word(&mut self) -> TokenKind {
        let start = self.pos - 1;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '?')
        {
            self.advance();
        }
        let word = &self.source[start..self.pos];
        TokenKind::keyword(word).unwrap_or_else(|| TokenKind::Identifier(word.to_string()))
    }

    /// String body after the opening quote.
    fn scan_string(&mut self) -> TokenKind {
        let mut value = String::new();
        loop {
            match self.advance() {
                None => return TokenKind::Illegal("unterminated string".to_string()),
                Some('"') => return TokenKind::Str(value),
                Some('\\') => match self.advance() {
                    None => return TokenKind::Illegal("unterminated string".to_string()),
                    Some('n') => value.push('\n'),
                    Some(escaped) => value.push(escaped),
                },
                Some(ch) => value.push(ch),
            }
        }
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        let token = self.scan();
        tracing::trace!(kind = token.kind.name(), span = %token.span, "lexer: token");
        token
    }
}

/// Replays a pre-lexed token list.
impl TokenSource for std::vec::IntoIter<Token> {
    fn next_token(&mut self) -> Token {
        self.next()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, Span::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::for_str("  ");
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = Lexer::for_str("val x\n  = 10").tokenize();
        assert_eq!(tokens[0].span, Span::new(1, 1, 1, 3));
        assert_eq!(tokens[2].span, Span::new(2, 3, 2, 3));
        assert_eq!(tokens[3].span, Span::new(2, 5, 2, 6));
    }

    #[test]
    fn test_vec_source_ends_with_eof() {
        let mut source = vec![Token::new(TokenKind::Comma, Span::point(1, 1))].into_iter();
        assert_eq!(source.next_token().kind, TokenKind::Comma);
        assert_eq!(source.next_token().kind, TokenKind::Eof);
    }
}
