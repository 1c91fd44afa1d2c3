//! Styling: property values, the `Style` bag, selectors, easing and the
//! style sheet dialect.

pub mod descriptor;
pub mod easing;
pub mod parser;
pub mod property;
pub mod selector;
pub mod sheet;
#[allow(clippy::module_inception)]
pub mod style;
pub mod tokenizer;
pub mod value;

pub use descriptor::{PropertyAccess, PropertyId, PROPERTIES};
pub use easing::{CubicBezier, Easing};
pub use parser::{parse_sheet, DeclarationValue, FromDeclaration, ParseError};
pub use property::{Animate, AnimatedValue, Scope, StyleProperty, Transition};
pub use selector::{Combinator, Selector, SelectorSubject, SelectorToken, StyleClass};
pub use sheet::StyleSheet;
pub use style::Style;
pub use value::{Align, Color, Display, FlexDirection, FontWeight, Justify, Length, Position};
