//! Session configuration.

use crate::geometry::Size;
use crate::style::parser::ParseError;
use crate::style::sheet::StyleSheet;
use crate::style::style::Style;

/// Configuration for a [`Session`](super::Session).
///
/// ```
/// use weft::build::SessionConfig;
/// use weft::geometry::Size;
///
/// let config = SessionConfig::new()
///     .with_viewport(Size::new(320.0, 240.0))
///     .with_css(".primary { color: #3366ff; }")
///     .unwrap();
/// assert_eq!(config.sheet.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The style every cascade starts from.
    pub baseline: Style,
    /// Session-wide rules, matched against every node.
    pub sheet: StyleSheet,
    /// Reference size for `vw`/`vh` lengths.
    pub viewport: Size,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            baseline: Style::baseline(),
            sheet: StyleSheet::new(),
            viewport: Size::new(800.0, 600.0),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the baseline style (builder).
    pub fn with_baseline(mut self, baseline: Style) -> Self {
        self.baseline = baseline;
        self
    }

    /// Append the rules of `sheet` (builder).
    pub fn with_sheet(mut self, sheet: StyleSheet) -> Self {
        self.sheet.append(sheet);
        self
    }

    /// Parse `css` and append its rules (builder).
    pub fn with_css(self, css: &str) -> Result<Self, ParseError> {
        let sheet = StyleSheet::parse(css)?;
        Ok(self.with_sheet(sheet))
    }

    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }
}
