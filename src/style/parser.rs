//! Recursive descent parser for style sheets.
//!
//! ```text
//! .button            { background: #eeeeee; transition: background 150ms ease-out; }
//! .button:hover      { background: #dddddd; transition: background 150ms ease-out; }
//! .panel .title      { color: blue !inherit; }
//! .card              { padding: 8px; &:hover { opacity: 0.9; } }
//! .toolbar           { class: compact; }
//! ```
//!
//! A compound (`.a.b:hover`) becomes tokens joined by "same node"; whitespace
//! between compounds becomes "strict ancestor". `&` inside a block opens a
//! nested rule on the enclosing node. `class:` attaches classes, `transition:`
//! configures animation for properties set in the same block, and `!inherit`
//! scopes a declaration to the node and its descendants.

use std::time::Duration;

use logos::Logos;

use super::descriptor::{PropertyId, PROPERTIES};
use super::easing::Easing;
use super::property::{Scope, Transition};
use super::selector::{Combinator, Selector, SelectorToken, StyleClass};
use super::sheet::StyleSheet;
use super::style::Style;
use super::tokenizer::Token;
use super::value::{Align, Color, Display, FlexDirection, FontWeight, Justify, Length, Position};

/// Errors from style sheet parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token at position {position}: {message}")]
    UnexpectedToken { position: usize, message: String },
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),
    #[error("unknown property: {0}")]
    UnknownProperty(String),
    #[error("invalid value for {property}: {message}")]
    InvalidValue { property: String, message: String },
}

/// A value token within a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationValue {
    /// An identifier like `red`, `bold`, `center`.
    Ident(String),
    /// A bare number like `10`, `0.5`.
    Number(f32),
    /// A number with a unit suffix like `4px`, `50%`, `150ms`.
    Dimension(f32, String),
    /// Hex digits of a color, without the `#`.
    Color(String),
    /// A quoted string, without the quotes.
    String(String),
    /// A function call like `cubic-bezier(0.4, 0, 0.2, 1)`.
    Function(String, Vec<DeclarationValue>),
}

/// Conversion from declaration values to a property's value type.
pub trait FromDeclaration: Sized {
    fn from_declaration(values: &[DeclarationValue]) -> Result<Self, String>;
}

fn single(values: &[DeclarationValue]) -> Result<&DeclarationValue, String> {
    match values {
        [value] => Ok(value),
        [] => Err("missing value".into()),
        _ => Err(format!("expected one value, got {}", values.len())),
    }
}

impl FromDeclaration for f32 {
    fn from_declaration(values: &[DeclarationValue]) -> Result<Self, String> {
        match single(values)? {
            DeclarationValue::Number(n) => Ok(*n),
            DeclarationValue::Dimension(n, unit) if unit == "px" => Ok(*n),
            other => Err(format!("expected a number, got {other:?}")),
        }
    }
}

impl FromDeclaration for Length {
    fn from_declaration(values: &[DeclarationValue]) -> Result<Self, String> {
        match single(values)? {
            DeclarationValue::Number(n) => Ok(Length::Px(*n)),
            DeclarationValue::Dimension(n, unit) => match unit.as_str() {
                "px" => Ok(Length::Px(*n)),
                "%" => Ok(Length::Percent(*n)),
                "vw" => Ok(Length::Vw(*n)),
                "vh" => Ok(Length::Vh(*n)),
                _ => Err(format!("unit '{unit}' is not a length")),
            },
            DeclarationValue::Ident(name) if name == "auto" => Ok(Length::Auto),
            other => Err(format!("expected a length, got {other:?}")),
        }
    }
}

impl FromDeclaration for Color {
    fn from_declaration(values: &[DeclarationValue]) -> Result<Self, String> {
        match single(values)? {
            DeclarationValue::Color(hex) => {
                Color::from_hex(hex).ok_or_else(|| format!("invalid hex color '#{hex}'"))
            }
            DeclarationValue::Ident(name) => {
                Color::named(name).ok_or_else(|| format!("unknown color '{name}'"))
            }
            other => Err(format!("expected a color, got {other:?}")),
        }
    }
}

impl FromDeclaration for String {
    fn from_declaration(values: &[DeclarationValue]) -> Result<Self, String> {
        let words = values
            .iter()
            .map(|v| match v {
                DeclarationValue::Ident(s) | DeclarationValue::String(s) => Ok(s.as_str()),
                other => Err(format!("expected a name, got {other:?}")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        if words.is_empty() {
            return Err("missing value".into());
        }
        Ok(words.join(" "))
    }
}

/// Keyword-valued enums.
macro_rules! keywords {
    ($ty:ty { $($kw:literal => $variant:expr),+ $(,)? }) => {
        impl FromDeclaration for $ty {
            fn from_declaration(values: &[DeclarationValue]) -> Result<Self, String> {
                match single(values)? {
                    DeclarationValue::Ident(name) => match name.as_str() {
                        $($kw => Ok($variant),)+
                        other => Err(format!("unknown keyword '{other}'")),
                    },
                    other => Err(format!("expected a keyword, got {other:?}")),
                }
            }
        }
    };
}

keywords!(Display { "flex" => Display::Flex, "none" => Display::None });
keywords!(FlexDirection {
    "row" => FlexDirection::Row,
    "column" => FlexDirection::Column,
    "row-reverse" => FlexDirection::RowReverse,
    "column-reverse" => FlexDirection::ColumnReverse,
});
keywords!(Align {
    "start" => Align::Start,
    "end" => Align::End,
    "center" => Align::Center,
    "stretch" => Align::Stretch,
    "baseline" => Align::Baseline,
});
keywords!(Justify {
    "start" => Justify::Start,
    "end" => Justify::End,
    "center" => Justify::Center,
    "space-between" => Justify::SpaceBetween,
    "space-around" => Justify::SpaceAround,
    "space-evenly" => Justify::SpaceEvenly,
});
keywords!(Position { "relative" => Position::Relative, "absolute" => Position::Absolute });
keywords!(FontWeight {
    "light" => FontWeight::Light,
    "regular" => FontWeight::Regular,
    "normal" => FontWeight::Regular,
    "medium" => FontWeight::Medium,
    "bold" => FontWeight::Bold,
});

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// A positioned token with byte-level span information for whitespace detection.
#[derive(Debug, Clone)]
struct PToken {
    token: Token,
    text: String,
    /// Index in the token stream (for error reporting).
    pos: usize,
    byte_start: usize,
    byte_end: usize,
}

/// Replace `/* ... */` comments with a single space each.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("/*") {
        result.push_str(&rest[..start]);
        result.push(' ');
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + 2 + end + 2..],
            None => "",
        };
    }
    result.push_str(rest);
    result
}

fn tokenize_with_spans(input: &str) -> Vec<PToken> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .enumerate()
        .map(|(pos, (token, span))| PToken {
            text: input[span.clone()].to_string(),
            token,
            pos,
            byte_start: span.start,
            byte_end: span.end,
        })
        .collect()
}

/// Parse style sheet text.
pub fn parse_sheet(input: &str) -> Result<StyleSheet, ParseError> {
    let cleaned = strip_comments(input);
    let mut parser = Parser {
        tokens: tokenize_with_spans(&cleaned),
        cursor: 0,
    };

    let mut sheet = StyleSheet::new();
    while !parser.is_eof() {
        let selectors = parser.parse_selector_list()?;
        let style = parser.parse_block()?;
        for selector in selectors {
            sheet.push(selector, style.clone());
        }
    }
    Ok(sheet)
}

struct Parser {
    tokens: Vec<PToken>,
    cursor: usize,
}

impl Parser {
    fn is_eof(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    fn peek(&self) -> Option<&PToken> {
        self.tokens.get(self.cursor)
    }

    fn peek_is(&self, token: &Token) -> bool {
        self.peek().is_some_and(|t| &t.token == token)
    }

    fn advance(&mut self) -> Option<PToken> {
        let tok = self.tokens.get(self.cursor).cloned();
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<PToken, ParseError> {
        match self.advance() {
            Some(tok) if &tok.token == expected => Ok(tok),
            Some(tok) => Err(unexpected(&tok, &format!("expected {expected:?}"))),
            None => Err(ParseError::UnexpectedEof(format!("expected {expected:?}"))),
        }
    }

    fn current_pos(&self) -> usize {
        self.peek().map(|t| t.pos).unwrap_or(self.tokens.len())
    }

    /// Whether the current token touches the previous one (no whitespace).
    fn is_adjacent(&self) -> bool {
        match (self.cursor.checked_sub(1).and_then(|i| self.tokens.get(i)), self.peek()) {
            (Some(prev), Some(curr)) => curr.byte_start == prev.byte_end,
            _ => false,
        }
    }

    fn parse_selector_list(&mut self) -> Result<Vec<Selector>, ParseError> {
        let mut selectors = vec![self.parse_selector()?];
        while self.peek_is(&Token::Comma) {
            self.advance();
            selectors.push(self.parse_selector()?);
        }
        Ok(selectors)
    }

    /// Parse whitespace-separated compounds and build a subject-first selector.
    fn parse_selector(&mut self) -> Result<Selector, ParseError> {
        let mut compounds = vec![self.parse_compound()?];
        while self
            .peek()
            .is_some_and(|t| matches!(t.token, Token::Dot | Token::Ident | Token::PseudoClass))
        {
            compounds.push(self.parse_compound()?);
        }

        // The rightmost compound is the styled node; each compound to its left
        // is an ancestor of the one after it.
        let mut selector: Option<Selector> = None;
        for compound in compounds.into_iter().rev() {
            for (i, class) in compound.into_iter().enumerate() {
                let combinator = if i == 0 {
                    Combinator::Ancestor
                } else {
                    Combinator::And
                };
                match selector.as_mut() {
                    Some(sel) => sel.push(combinator, SelectorToken::Class(class)),
                    None => selector = Some(Selector::class(class)),
                }
            }
        }
        selector.ok_or_else(|| ParseError::UnexpectedToken {
            position: self.current_pos(),
            message: "expected selector".into(),
        })
    }

    /// Parse one compound: `Kind.class:pseudo` with no whitespace inside.
    fn parse_compound(&mut self) -> Result<Vec<StyleClass>, ParseError> {
        let mut classes = vec![self.parse_simple()?];
        while self.is_adjacent()
            && self
                .peek()
                .is_some_and(|t| matches!(t.token, Token::Dot | Token::PseudoClass))
        {
            classes.push(self.parse_simple()?);
        }
        Ok(classes)
    }

    fn parse_simple(&mut self) -> Result<StyleClass, ParseError> {
        let tok = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof("expected selector part".into()))?;
        match tok.token {
            // Kind names select through the class every node of that kind carries.
            Token::Ident => Ok(StyleClass::from_runtime(&tok.text)),
            Token::PseudoClass => Ok(StyleClass::from_runtime(&tok.text[1..])),
            Token::Dot => {
                let name = self.expect(&Token::Ident)?;
                Ok(StyleClass::from_runtime(&name.text))
            }
            _ => Err(unexpected(&tok, "expected selector part")),
        }
    }

    /// Parse `{ declarations and nested rules }` into a style.
    fn parse_block(&mut self) -> Result<Style, ParseError> {
        self.expect(&Token::BraceOpen)?;
        let mut style = Style::new();
        let mut transitions: Vec<(Option<PropertyId>, Transition)> = Vec::new();

        loop {
            match self.peek().map(|t| t.token.clone()) {
                None => return Err(ParseError::UnexpectedEof("expected '}'".into())),
                Some(Token::BraceClose) => {
                    self.advance();
                    break;
                }
                Some(Token::Semicolon) => {
                    self.advance();
                }
                Some(Token::Amp) => {
                    self.advance();
                    let nested = self.parse_nested_selector()?;
                    let body = self.parse_block()?;
                    style.rules.push((nested, body));
                }
                Some(_) => self.parse_declaration(&mut style, &mut transitions)?,
            }
        }

        for (target, transition) in transitions {
            for row in PROPERTIES.iter().filter(|row| row.animatable()) {
                let wanted = target.map_or(row.is_set(&style), |id| id == row.id());
                if wanted {
                    row.set_transition(&mut style, transition);
                }
            }
        }
        Ok(style)
    }

    /// After `&`: adjacent `.class`/`:pseudo` parts apply to the same node,
    /// a space followed by compounds selects descendants.
    fn parse_nested_selector(&mut self) -> Result<Selector, ParseError> {
        if self.is_adjacent() {
            let mut classes = self.parse_compound()?.into_iter();
            let first = classes.next().ok_or_else(|| ParseError::UnexpectedToken {
                position: self.current_pos(),
                message: "expected selector after '&'".into(),
            })?;
            let mut selector = Selector::class(first);
            for class in classes {
                selector = selector.and(class);
            }
            Ok(selector)
        } else {
            self.parse_selector()
        }
    }

    fn parse_declaration(
        &mut self,
        style: &mut Style,
        transitions: &mut Vec<(Option<PropertyId>, Transition)>,
    ) -> Result<(), ParseError> {
        let name_tok = self.expect(&Token::Ident)?;
        let name = name_tok.text.clone();

        // `color:red` lexes as Ident + PseudoClass.
        let mut values = Vec::new();
        match self.advance() {
            Some(tok) if tok.token == Token::Colon => {}
            Some(tok) if tok.token == Token::PseudoClass => {
                values.push(DeclarationValue::Ident(tok.text[1..].to_string()));
            }
            Some(tok) => return Err(unexpected(&tok, "expected ':'")),
            None => return Err(ParseError::UnexpectedEof("expected ':'".into())),
        }

        let mut scope = Scope::SelfOnly;
        let mut groups = vec![Vec::new()];
        loop {
            match self.peek().map(|t| t.token.clone()) {
                None | Some(Token::Semicolon) | Some(Token::BraceClose) => break,
                Some(Token::Inherit) => {
                    self.advance();
                    scope = Scope::SelfAndDescendants;
                }
                Some(Token::Comma) => {
                    self.advance();
                    groups.push(Vec::new());
                }
                Some(_) => {
                    let value = self.parse_value()?;
                    if let Some(group) = groups.last_mut() {
                        group.push(value);
                    }
                }
            }
        }
        if let Some(first) = groups.first_mut() {
            let mut head = std::mem::take(&mut values);
            head.append(first);
            *first = head;
        }

        match name.as_str() {
            "class" => {
                for value in groups.into_iter().flatten() {
                    match value {
                        DeclarationValue::Ident(class) => {
                            style.add_class(StyleClass::from_runtime(&class))
                        }
                        other => return Err(invalid(&name, format!("expected class name, got {other:?}"))),
                    }
                }
                Ok(())
            }
            "transition" => {
                for group in groups {
                    transitions.push(parse_transition(&group).map_err(|m| invalid(&name, m))?);
                }
                Ok(())
            }
            _ => {
                let id = PropertyId::from_name(&name)
                    .ok_or_else(|| ParseError::UnknownProperty(name.clone()))?;
                let values: Vec<_> = groups.into_iter().flatten().collect();
                let row = id.descriptor();
                row.parse_into(style, &values).map_err(|m| invalid(&name, m))?;
                row.set_scope(style, scope);
                Ok(())
            }
        }
    }

    fn parse_value(&mut self) -> Result<DeclarationValue, ParseError> {
        let tok = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof("expected value".into()))?;
        match tok.token {
            Token::Number => Ok(DeclarationValue::Number(parse_number(&tok)?)),
            Token::Dimension => {
                let split = tok
                    .text
                    .find(|c: char| c.is_ascii_alphabetic() || c == '%')
                    .unwrap_or(tok.text.len());
                let (num, unit) = tok.text.split_at(split);
                let value = num
                    .parse::<f32>()
                    .map_err(|_| unexpected(&tok, "invalid number"))?;
                Ok(DeclarationValue::Dimension(value, unit.to_string()))
            }
            Token::HexColor => Ok(DeclarationValue::Color(tok.text[1..].to_string())),
            Token::StringLiteral => {
                Ok(DeclarationValue::String(tok.text[1..tok.text.len() - 1].to_string()))
            }
            Token::Ident if self.peek_is(&Token::ParenOpen) && self.is_adjacent() => {
                self.advance();
                let mut args = Vec::new();
                while !self.peek_is(&Token::ParenClose) {
                    if self.peek_is(&Token::Comma) {
                        self.advance();
                        continue;
                    }
                    args.push(self.parse_value()?);
                }
                self.expect(&Token::ParenClose)?;
                Ok(DeclarationValue::Function(tok.text, args))
            }
            Token::Ident => Ok(DeclarationValue::Ident(tok.text)),
            _ => Err(unexpected(&tok, "expected value")),
        }
    }
}

fn parse_number(tok: &PToken) -> Result<f32, ParseError> {
    tok.text
        .parse::<f32>()
        .map_err(|_| unexpected(tok, "invalid number"))
}

fn unexpected(tok: &PToken, message: &str) -> ParseError {
    ParseError::UnexpectedToken {
        position: tok.pos,
        message: format!("{message}, got {:?} '{}'", tok.token, tok.text),
    }
}

fn invalid(property: &str, message: String) -> ParseError {
    ParseError::InvalidValue {
        property: property.to_string(),
        message,
    }
}

/// `<property|all> <duration> [<delay>] [<easing>]`.
fn parse_transition(
    values: &[DeclarationValue],
) -> Result<(Option<PropertyId>, Transition), String> {
    let mut iter = values.iter();
    let target = match iter.next() {
        Some(DeclarationValue::Ident(name)) if name == "all" => None,
        Some(DeclarationValue::Ident(name)) => {
            let id = PropertyId::from_name(name).ok_or_else(|| format!("unknown property '{name}'"))?;
            if !id.descriptor().animatable() {
                return Err(format!("'{name}' cannot be animated"));
            }
            Some(id)
        }
        other => return Err(format!("expected property name, got {other:?}")),
    };

    let mut durations = Vec::new();
    let mut easing = Easing::Linear;
    for value in iter {
        match value {
            DeclarationValue::Dimension(n, unit) if unit == "ms" => {
                durations.push(seconds(n.max(0.0) / 1000.0)?)
            }
            DeclarationValue::Dimension(n, unit) if unit == "s" => durations.push(seconds(n.max(0.0))?),
            DeclarationValue::Ident(name) => {
                easing = Easing::from_keyword(name).ok_or_else(|| format!("unknown easing '{name}'"))?;
            }
            DeclarationValue::Function(name, args) if name == "cubic-bezier" => {
                let nums = args
                    .iter()
                    .map(|a| match a {
                        DeclarationValue::Number(n) => Ok(*n),
                        other => Err(format!("expected number, got {other:?}")),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let [x1, y1, x2, y2] = nums[..] else {
                    return Err("cubic-bezier takes four numbers".into());
                };
                easing = Easing::cubic_bezier(x1, y1, x2, y2);
            }
            DeclarationValue::Function(name, args) if name == "steps" => match args.as_slice() {
                [DeclarationValue::Number(n)] if *n >= 1.0 => easing = Easing::Steps(*n as u32),
                _ => return Err("steps takes one positive integer".into()),
            },
            other => return Err(format!("unexpected {other:?}")),
        }
    }

    let (duration, delay) = match durations[..] {
        [duration] => (duration, Duration::ZERO),
        [duration, delay] => (duration, delay),
        _ => return Err("expected a duration and an optional delay".into()),
    };
    Ok((
        target,
        Transition::new(duration).with_delay(delay).with_easing(easing),
    ))
}

fn seconds(secs: f32) -> Result<Duration, String> {
    Duration::try_from_secs_f32(secs).map_err(|_| "duration out of range".to_string())
}
