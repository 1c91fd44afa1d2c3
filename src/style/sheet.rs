//! Parsed style sheets.

use std::str::FromStr;

use super::parser::{parse_sheet, ParseError};
use super::selector::Selector;
use super::style::Style;

/// An ordered list of `(selector, style)` rules.
///
/// A sheet contributes rules only: it never sets properties on a node
/// directly. Later rules win over earlier ones when both match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    rules: Vec<(Selector, Style)>,
}

impl StyleSheet {
    /// An empty sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse style sheet text.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        parse_sheet(input)
    }

    /// Append a rule.
    pub fn push(&mut self, selector: Selector, style: Style) {
        self.rules.push((selector, style));
    }

    /// Append every rule of `other` after this sheet's rules.
    pub fn append(&mut self, other: StyleSheet) {
        self.rules.extend(other.rules);
    }

    /// The rules in source order.
    pub fn rules(&self) -> &[(Selector, Style)] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The sheet as a style carrying only rules, ready to sit in a cascade layer.
    pub fn to_style(&self) -> Style {
        Style {
            rules: self.rules.clone(),
            ..Style::default()
        }
    }
}

impl FromStr for StyleSheet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sheet(s)
    }
}
