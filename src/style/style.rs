//! The `Style` property bag and its cascade merge.

use std::ops::{Add, AddAssign};

use super::descriptor::{PropertyId, PROPERTIES};
use super::property::StyleProperty;
use super::selector::{Selector, StyleClass};
use super::value::{Align, Color, Display, FlexDirection, FontWeight, Justify, Length, Position};

/// All visual properties of a node, each an optional [`StyleProperty`], plus
/// the classes this style attaches and its conditional rules.
///
/// Properties are enumerated once in [`PROPERTIES`](super::descriptor::PROPERTIES);
/// merge, inheritance, animation and layout mapping iterate that table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    // Paint
    pub color: StyleProperty<Color>,
    pub background: StyleProperty<Color>,
    pub border_color: StyleProperty<Color>,
    pub opacity: StyleProperty<f32>,
    pub corner_radius: StyleProperty<f32>,

    // Font
    pub font_family: StyleProperty<String>,
    pub font_size: StyleProperty<f32>,
    pub font_weight: StyleProperty<FontWeight>,

    // Transform
    pub translate_x: StyleProperty<f32>,
    pub translate_y: StyleProperty<f32>,
    pub scale: StyleProperty<f32>,
    pub rotation: StyleProperty<f32>,

    // Sizing
    pub width: StyleProperty<Length>,
    pub height: StyleProperty<Length>,
    pub min_width: StyleProperty<Length>,
    pub min_height: StyleProperty<Length>,
    pub max_width: StyleProperty<Length>,
    pub max_height: StyleProperty<Length>,

    // Box edges: the unsuffixed field applies to all four edges unless the
    // edge-specific field is set.
    pub margin: StyleProperty<Length>,
    pub margin_top: StyleProperty<Length>,
    pub margin_right: StyleProperty<Length>,
    pub margin_bottom: StyleProperty<Length>,
    pub margin_left: StyleProperty<Length>,
    pub padding: StyleProperty<Length>,
    pub padding_top: StyleProperty<Length>,
    pub padding_right: StyleProperty<Length>,
    pub padding_bottom: StyleProperty<Length>,
    pub padding_left: StyleProperty<Length>,
    pub border_width: StyleProperty<Length>,
    pub border_top: StyleProperty<Length>,
    pub border_right: StyleProperty<Length>,
    pub border_bottom: StyleProperty<Length>,
    pub border_left: StyleProperty<Length>,

    // Flex
    pub display: StyleProperty<Display>,
    pub flex_direction: StyleProperty<FlexDirection>,
    pub justify_content: StyleProperty<Justify>,
    pub align_items: StyleProperty<Align>,
    pub flex_grow: StyleProperty<f32>,
    pub flex_shrink: StyleProperty<f32>,
    pub flex_basis: StyleProperty<Length>,
    pub gap: StyleProperty<Length>,

    // Positioning
    pub position: StyleProperty<Position>,
    pub inset_top: StyleProperty<Length>,
    pub inset_right: StyleProperty<Length>,
    pub inset_bottom: StyleProperty<Length>,
    pub inset_left: StyleProperty<Length>,

    /// Classes attached to the node this style resolves for.
    pub classes: Vec<StyleClass>,
    /// Conditional sub-styles, applied when their selector matches.
    pub rules: Vec<(Selector, Style)>,
}

impl Style {
    /// An empty style (nothing set, no rules).
    pub fn new() -> Self {
        Self::default()
    }

    /// The default baseline every cascade starts from: black text, no fill,
    /// fully opaque, identity transform.
    pub fn baseline() -> Self {
        let mut style = Style::new();
        style.color.set(Color::BLACK);
        style.background.set(Color::TRANSPARENT);
        style.border_color.set(Color::TRANSPARENT);
        style.opacity.set(1.0);
        style.corner_radius.set(0.0);
        style.font_size.set(14.0);
        style.font_weight.set(FontWeight::Regular);
        style.translate_x.set(0.0);
        style.translate_y.set(0.0);
        style.scale.set(1.0);
        style.rotation.set(0.0);
        style
    }

    /// Apply `f` to the style (builder).
    pub fn with(mut self, f: impl FnOnce(&mut Style)) -> Self {
        f(&mut self);
        self
    }

    /// Attach a class (builder). Duplicates are ignored.
    pub fn with_class(mut self, class: StyleClass) -> Self {
        self.add_class(class);
        self
    }

    /// Add a conditional rule (builder).
    pub fn rule(mut self, selector: Selector, style: Style) -> Self {
        self.rules.push((selector, style));
        self
    }

    /// Attach a class. Duplicates are ignored.
    pub fn add_class(&mut self, class: StyleClass) {
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    /// Whether a property is set, by id.
    pub fn is_set(&self, id: PropertyId) -> bool {
        id.descriptor().is_set(self)
    }

    /// Returns `true` if no property is set and there are no classes or rules.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.rules.is_empty()
            && PROPERTIES.iter().all(|p| !p.is_set(self))
    }

    /// Merge only the properties of `other` (not its classes or rules).
    pub fn merge_properties(&mut self, other: &Style) {
        for property in PROPERTIES {
            property.merge(self, other);
        }
    }

    /// The subset of this style that descendants inherit: every property whose
    /// scope is [`Scope::SelfAndDescendants`](super::Scope::SelfAndDescendants).
    /// Classes and rules are not inherited.
    pub fn inherited(&self) -> Style {
        let mut out = Style::new();
        for property in PROPERTIES {
            property.inherit(&mut out, self);
        }
        out
    }

    /// Resolve per-edge shorthands: an edge without its own value takes the
    /// all-edges value. The all-edges fields are left as they are.
    pub fn flatten_edges(&mut self) {
        fn fill(all: &StyleProperty<Length>, edge: &mut StyleProperty<Length>) {
            if !edge.is_set() {
                edge.merge_from(all);
            }
        }
        fill(&self.margin, &mut self.margin_top);
        fill(&self.margin, &mut self.margin_right);
        fill(&self.margin, &mut self.margin_bottom);
        fill(&self.margin, &mut self.margin_left);
        fill(&self.padding, &mut self.padding_top);
        fill(&self.padding, &mut self.padding_right);
        fill(&self.padding, &mut self.padding_bottom);
        fill(&self.padding, &mut self.padding_left);
        fill(&self.border_width, &mut self.border_top);
        fill(&self.border_width, &mut self.border_right);
        fill(&self.border_width, &mut self.border_bottom);
        fill(&self.border_width, &mut self.border_left);
    }
}

impl AddAssign<&Style> for Style {
    /// Cascade `rhs` on top of `self`: set properties replace, classes union,
    /// rule lists concatenate.
    fn add_assign(&mut self, rhs: &Style) {
        self.merge_properties(rhs);
        for class in &rhs.classes {
            self.add_class(*class);
        }
        self.rules.extend(rhs.rules.iter().cloned());
    }
}

impl AddAssign<Style> for Style {
    fn add_assign(&mut self, rhs: Style) {
        self.merge_properties(&rhs);
        for class in rhs.classes {
            self.add_class(class);
        }
        self.rules.extend(rhs.rules);
    }
}

impl Add<&Style> for Style {
    type Output = Style;

    fn add(mut self, rhs: &Style) -> Style {
        self += rhs;
        self
    }
}

impl Add<Style> for Style {
    type Output = Style;

    fn add(mut self, rhs: Style) -> Style {
        self += rhs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::property::{Scope, Transition};
    use pretty_assertions::assert_eq;

    const PRIMARY: StyleClass = StyleClass::new("primary");

    #[test]
    fn new_is_empty() {
        assert!(Style::new().is_empty());
        assert!(!Style::baseline().is_empty());
    }

    #[test]
    fn merge_keeps_base_when_other_empty() {
        let mut base = Style::new().with(|s| {
            s.color.set(Color::RED);
            s.display.set(Display::Flex);
        });
        base += &Style::new();
        assert_eq!(base.color.get(), Some(&Color::RED));
        assert_eq!(base.display.get(), Some(&Display::Flex));
    }

    #[test]
    fn merge_other_overrides_base() {
        let mut base = Style::new().with(|s| {
            s.color.set(Color::RED);
            s.background.set(Color::WHITE);
        });
        base += Style::new().with(|s| {
            s.color.set(Color::BLUE);
        });
        assert_eq!(base.color.get(), Some(&Color::BLUE));
        assert_eq!(base.background.get(), Some(&Color::WHITE));
    }

    #[test]
    fn merge_replaces_transition_with_value() {
        let mut base = Style::new().with(|s| {
            s.opacity.set(1.0).transition(Transition::millis(100));
        });
        base += Style::new().with(|s| {
            s.opacity.set(0.5);
        });
        assert_eq!(base.opacity.get(), Some(&0.5));
        assert!(base.opacity.transition.is_none());
    }

    #[test]
    fn merge_concatenates_rules_and_unions_classes() {
        let a = Style::new()
            .with_class(PRIMARY)
            .rule(Selector::class(StyleClass::HOVER), Style::new());
        let b = Style::new()
            .with_class(PRIMARY)
            .with_class(StyleClass::new("large"))
            .rule(Selector::class(StyleClass::ACTIVE), Style::new());
        let merged = a + b;
        assert_eq!(merged.classes.len(), 2);
        assert_eq!(merged.rules.len(), 2);
        assert_eq!(merged.rules[0].0, Selector::class(StyleClass::HOVER));
        assert_eq!(merged.rules[1].0, Selector::class(StyleClass::ACTIVE));
    }

    #[test]
    fn merge_is_not_commutative() {
        let red = Style::new().with(|s| {
            s.color.set(Color::RED);
        });
        let blue = Style::new().with(|s| {
            s.color.set(Color::BLUE);
        });
        assert_eq!((red.clone() + &blue).color.get(), Some(&Color::BLUE));
        assert_eq!((blue + &red).color.get(), Some(&Color::RED));
    }

    #[test]
    fn inherited_keeps_only_descendant_scoped_properties() {
        let style = Style::new()
            .with(|s| {
                s.color.set(Color::RED).inherit();
                s.background.set(Color::BLUE);
                s.font_family.set("Inter".to_owned()).inherit();
            })
            .with_class(PRIMARY)
            .rule(Selector::class(StyleClass::HOVER), Style::new());

        let inherited = style.inherited();
        assert_eq!(inherited.color.get(), Some(&Color::RED));
        assert_eq!(inherited.color.scope, Scope::SelfAndDescendants);
        assert_eq!(inherited.font_family.get().map(String::as_str), Some("Inter"));
        assert!(!inherited.background.is_set());
        assert!(inherited.classes.is_empty());
        assert!(inherited.rules.is_empty());
    }

    #[test]
    fn flatten_edges_composes_all_and_single_edge() {
        let mut style = Style::new().with(|s| {
            s.margin.set(Length::Px(4.0));
            s.margin_left.set(Length::Px(10.0));
        });
        style.flatten_edges();
        assert_eq!(style.margin_top.get(), Some(&Length::Px(4.0)));
        assert_eq!(style.margin_right.get(), Some(&Length::Px(4.0)));
        assert_eq!(style.margin_bottom.get(), Some(&Length::Px(4.0)));
        assert_eq!(style.margin_left.get(), Some(&Length::Px(10.0)));
        assert!(!style.padding_top.is_set());
    }

    #[test]
    fn is_set_by_id() {
        let style = Style::new().with(|s| {
            s.gap.set(Length::Px(2.0));
        });
        assert!(style.is_set(PropertyId::Gap));
        assert!(!style.is_set(PropertyId::Width));
    }

    #[test]
    fn chained_cascade() {
        let defaults = Style::baseline();
        let widget = Style::new().with(|s| {
            s.color.set(Color::GRAY);
            s.padding.set(Length::Px(1.0));
        });
        let user = Style::new().with(|s| {
            s.color.set(Color::RED);
        });
        let result = defaults + &widget + &user;
        assert_eq!(result.color.get(), Some(&Color::RED));
        assert_eq!(result.opacity.get(), Some(&1.0));
        assert_eq!(result.padding.get(), Some(&Length::Px(1.0)));
    }
}
