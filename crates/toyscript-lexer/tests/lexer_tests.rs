//! Lexer tests: keywords, operators, literals, comments and illegal input.

use toyscript_lexer::{Lexer, TokenKind, TokenSource, KEYWORDS};
use toyscript_types::SourceFile;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return the token kinds, without the final Eof.
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.ts", source);
    let mut tokens = Lexer::new(&sf).tokenize();
    assert_eq!(tokens.pop().map(|t| t.kind), Some(TokenKind::Eof));
    tokens.into_iter().map(|t| t.kind).collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

fn int(digits: &str) -> TokenKind {
    TokenKind::Int(digits.to_string())
}

// ─────────────────────────────────────────────────────────────────────
// Keywords & identifiers
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_every_keyword_is_recognised() {
    for word in KEYWORDS {
        let kind = kinds(word).remove(0);
        assert!(
            !matches!(kind, TokenKind::Identifier(_)),
            "'{word}' lexed as an identifier"
        );
    }
}

#[test]
fn test_nil_is_null() {
    assert_eq!(kinds("NIL null"), vec![TokenKind::Null, TokenKind::Null]);
}

#[test]
fn test_identifiers_allow_question_mark_and_underscore() {
    assert_eq!(
        kinds("empty? _tmp x1 nil"),
        vec![ident("empty?"), ident("_tmp"), ident("x1"), ident("nil")]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    assert_eq!(kinds("value iffy"), vec![ident("value"), ident("iffy")]);
}

// ─────────────────────────────────────────────────────────────────────
// Operators & punctuation
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_operators() {
    assert_eq!(
        kinds("= == ! != + - * / % < > ; , ( ) { } [ ]"),
        vec![
            TokenKind::Assign,
            TokenKind::Eq,
            TokenKind::Bang,
            TokenKind::NotEq,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::RBracket,
        ]
    );
}

#[test]
fn test_statement() {
    assert_eq!(
        kinds("val x = [1, 22];"),
        vec![
            TokenKind::Val,
            ident("x"),
            TokenKind::Assign,
            TokenKind::LBracket,
            int("1"),
            TokenKind::Comma,
            int("22"),
            TokenKind::RBracket,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn test_negative_number_is_minus_then_int() {
    assert_eq!(kinds("-5"), vec![TokenKind::Minus, int("5")]);
}

// ─────────────────────────────────────────────────────────────────────
// Strings
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_string_escapes() {
    assert_eq!(
        kinds(r#""a\nb" "q\"t" "back\\slash" "\t""#),
        vec![
            TokenKind::Str("a\nb".into()),
            TokenKind::Str("q\"t".into()),
            TokenKind::Str("back\\slash".into()),
            TokenKind::Str("t".into()),
        ]
    );
}

#[test]
fn test_string_keeps_hash() {
    assert_eq!(
        kinds(r##""# not a comment""##),
        vec![TokenKind::Str("# not a comment".into())]
    );
}

#[test]
fn test_unterminated_string_is_illegal() {
    assert_eq!(
        kinds("\"abc"),
        vec![TokenKind::Illegal("unterminated string".into())]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Comments, whitespace & illegal input
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("# header\nx # trailing\n\t# indented\ny"),
        vec![ident("x"), ident("y")]
    );
}

#[test]
fn test_illegal_character() {
    assert_eq!(
        kinds("a @ b"),
        vec![ident("a"), TokenKind::Illegal("@".into()), ident("b")]
    );
}

#[test]
fn test_lexer_is_lazy() {
    let sf = SourceFile::new("test.ts", "fn(x) { x }");
    let mut lexer = Lexer::new(&sf);
    assert_eq!(lexer.next_token().kind, TokenKind::Fn);
    assert_eq!(lexer.next_token().kind, TokenKind::LParen);
    assert_eq!(lexer.next_token().kind, ident("x"));
}

#[test]
fn test_token_literal_and_name() {
    let tokens = Lexer::for_str("!= \"s\" 42").tokenize();
    assert_eq!(tokens[0].literal(), "!=");
    assert_eq!(tokens[1].literal(), "\"s\"");
    assert_eq!(tokens[2].kind.name(), "INT");
    assert_eq!(tokens[3].kind.name(), "EOF");
}
