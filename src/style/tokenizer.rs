//! logos-based tokenizer for the style sheet dialect.
//!
//! Token priority in logos is determined by:
//! 1. Longest match wins (e.g. `#fff` as HexColor, `150ms` as Dimension)
//! 2. For equal length matches, earlier-defined variants win
//!
//! `:hover` lexes as [`Token::PseudoClass`]; the parser treats a pseudo-class
//! token right after a property name as `:` followed by a value.

use logos::Logos;

/// Style sheet token produced by the lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// `!inherit` flag: the declaration reaches descendants.
    #[token("!inherit")]
    Inherit,

    /// Hex color: `#fff`, `#ff00aa`, `#ff00aa80`.
    #[regex(r"#[0-9a-fA-F]{3,8}")]
    HexColor,

    /// Number with a unit: `4px`, `50%`, `10vw`, `80vh`, `150ms`, `2s`.
    #[regex(r"-?[0-9]+(\.[0-9]+)?(px|%|vw|vh|ms|s)")]
    Dimension,

    /// Pseudo-class: `:hover`, `:active`, `:disabled`, `:focus`.
    #[regex(r":[a-zA-Z][a-zA-Z0-9_-]*")]
    PseudoClass,

    /// Double-quoted string literal.
    #[regex(r#""[^"]*""#)]
    StringLiteral,

    /// Bare number, possibly negative or fractional.
    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,

    /// Identifier: class names, property names, keywords.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    /// Nested-rule anchor: `&:hover { ... }` inside a block.
    #[token("&")]
    Amp,
}

/// Tokenize a string into `(Token, text)` pairs. Unlexable input is skipped.
pub fn tokenize(input: &str) -> Vec<(Token, String)> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, input[span].to_string())))
        .collect()
}
