//! The property table.
//!
//! Every [`Style`] field has exactly one row in [`PROPERTIES`], in
//! [`PropertyId`] order. A row knows how to reach its field, whether the
//! value animates, and how it maps onto the layout solver's style. Merging,
//! inheritance filtering, animation, parsing and layout all iterate this table
//! instead of naming fields one by one.

use std::fmt;
use std::time::Instant;

use crate::cascade::transition::{animate_property, TransitionTable};
use crate::layout::resolve::{self as lay, Viewport};

use super::parser::{DeclarationValue, FromDeclaration};
use super::property::{Animate, Scope, StyleProperty, Transition};
use super::style::Style;
use super::value::{Color, Length};

/// Identifies one property row. The discriminant is the row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyId {
    Color,
    Background,
    BorderColor,
    Opacity,
    CornerRadius,
    FontFamily,
    FontSize,
    FontWeight,
    TranslateX,
    TranslateY,
    Scale,
    Rotation,
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    Margin,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    Padding,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    BorderWidth,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
    Display,
    FlexDirection,
    JustifyContent,
    AlignItems,
    FlexGrow,
    FlexShrink,
    FlexBasis,
    Gap,
    Position,
    InsetTop,
    InsetRight,
    InsetBottom,
    InsetLeft,
}

impl PropertyId {
    /// The table row for this property.
    pub fn descriptor(self) -> &'static dyn PropertyAccess {
        PROPERTIES[self as usize]
    }

    /// The property's style-sheet name.
    pub fn name(self) -> &'static str {
        self.descriptor().name()
    }

    /// Look a property up by its style-sheet name.
    pub fn from_name(name: &str) -> Option<PropertyId> {
        PROPERTIES.iter().find(|p| p.name() == name).map(|p| p.id())
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generic operations on one [`Style`] field.
pub trait PropertyAccess: Sync {
    fn id(&self) -> PropertyId;
    fn name(&self) -> &'static str;
    /// Whether the transition engine interpolates this property.
    fn animatable(&self) -> bool;

    fn is_set(&self, style: &Style) -> bool;
    /// Cascade `src`'s slot over `dst`'s slot.
    fn merge(&self, dst: &mut Style, src: &Style);
    /// Copy `src`'s slot into `dst` when it is scoped to descendants.
    fn inherit(&self, dst: &mut Style, src: &Style);
    fn clear(&self, style: &mut Style);
    fn set_transition(&self, style: &mut Style, transition: Transition);
    fn set_scope(&self, style: &mut Style, scope: Scope);

    /// Parse declaration values into `style`'s slot.
    fn parse_into(&self, style: &mut Style, values: &[DeclarationValue]) -> Result<(), String>;

    /// Animate `displayed`'s slot from `prev` towards `next`. Returns `true`
    /// while a transition for this property is still running.
    fn animate(
        &self,
        prev: &Style,
        next: &Style,
        displayed: &mut Style,
        transitions: &mut TransitionTable,
        now: Instant,
    ) -> bool;

    /// Push the slot's value into the layout solver's style. Unset values and
    /// paint-only properties leave `out` untouched.
    fn apply_layout(&self, style: &Style, out: &mut taffy::Style, viewport: Viewport);
}

type Get<T> = fn(&Style) -> &StyleProperty<T>;
type GetMut<T> = fn(&mut Style) -> &mut StyleProperty<T>;
type AnimateFn<T> = fn(
    PropertyId,
    &StyleProperty<T>,
    &StyleProperty<T>,
    &mut StyleProperty<T>,
    &mut TransitionTable,
    Instant,
) -> bool;
type LayoutFn<T> = fn(&T, &mut taffy::Style, Viewport);

/// A table row for a field of type `T`.
pub struct Field<T: 'static> {
    id: PropertyId,
    name: &'static str,
    get: Get<T>,
    get_mut: GetMut<T>,
    animate: Option<AnimateFn<T>>,
    layout: Option<LayoutFn<T>>,
}

impl<T> Field<T> {
    const fn new(id: PropertyId, name: &'static str, get: Get<T>, get_mut: GetMut<T>) -> Self {
        Self {
            id,
            name,
            get,
            get_mut,
            animate: None,
            layout: None,
        }
    }

    const fn layout(mut self, setter: LayoutFn<T>) -> Self {
        self.layout = Some(setter);
        self
    }
}

impl<T: Animate + Clone + PartialEq + 'static> Field<T> {
    const fn animated(mut self) -> Self {
        self.animate = Some(animate_property::<T>);
        self
    }
}

impl<T> PropertyAccess for Field<T>
where
    T: Clone + PartialEq + FromDeclaration + 'static,
{
    fn id(&self) -> PropertyId {
        self.id
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn animatable(&self) -> bool {
        self.animate.is_some()
    }

    fn is_set(&self, style: &Style) -> bool {
        (self.get)(style).is_set()
    }

    fn merge(&self, dst: &mut Style, src: &Style) {
        (self.get_mut)(dst).merge_from((self.get)(src));
    }

    fn inherit(&self, dst: &mut Style, src: &Style) {
        let slot = (self.get)(src);
        if slot.is_inherited() {
            (self.get_mut)(dst).merge_from(slot);
        }
    }

    fn clear(&self, style: &mut Style) {
        (self.get_mut)(style).clear();
    }

    fn set_transition(&self, style: &mut Style, transition: Transition) {
        (self.get_mut)(style).transition = Some(transition);
    }

    fn set_scope(&self, style: &mut Style, scope: Scope) {
        (self.get_mut)(style).scope = scope;
    }

    fn parse_into(&self, style: &mut Style, values: &[DeclarationValue]) -> Result<(), String> {
        let value = T::from_declaration(values)?;
        (self.get_mut)(style).value = Some(value);
        Ok(())
    }

    fn animate(
        &self,
        prev: &Style,
        next: &Style,
        displayed: &mut Style,
        transitions: &mut TransitionTable,
        now: Instant,
    ) -> bool {
        match self.animate {
            Some(animate) => animate(
                self.id,
                (self.get)(prev),
                (self.get)(next),
                (self.get_mut)(displayed),
                transitions,
                now,
            ),
            None => false,
        }
    }

    fn apply_layout(&self, style: &Style, out: &mut taffy::Style, viewport: Viewport) {
        if let (Some(setter), Some(value)) = (self.layout, (self.get)(style).get()) {
            setter(value, out, viewport);
        }
    }
}

use PropertyId as P;

macro_rules! row {
    ($id:ident, $name:literal, $field:ident) => {
        Field::new(P::$id, $name, |s| &s.$field, |s| &mut s.$field)
    };
}

static COLOR: Field<Color> = row!(Color, "color", color).animated();
static BACKGROUND: Field<Color> = row!(Background, "background", background).animated();
static BORDER_COLOR: Field<Color> = row!(BorderColor, "border-color", border_color).animated();
static OPACITY: Field<f32> = row!(Opacity, "opacity", opacity).animated();
static CORNER_RADIUS: Field<f32> = row!(CornerRadius, "corner-radius", corner_radius).animated();
static FONT_FAMILY: Field<String> = row!(FontFamily, "font-family", font_family);
static FONT_SIZE: Field<f32> = row!(FontSize, "font-size", font_size).animated();
static FONT_WEIGHT: Field<super::value::FontWeight> = row!(FontWeight, "font-weight", font_weight);
static TRANSLATE_X: Field<f32> = row!(TranslateX, "translate-x", translate_x).animated();
static TRANSLATE_Y: Field<f32> = row!(TranslateY, "translate-y", translate_y).animated();
static SCALE: Field<f32> = row!(Scale, "scale", scale).animated();
static ROTATION: Field<f32> = row!(Rotation, "rotation", rotation).animated();

static WIDTH: Field<Length> = row!(Width, "width", width).animated().layout(lay::width);
static HEIGHT: Field<Length> = row!(Height, "height", height).animated().layout(lay::height);
static MIN_WIDTH: Field<Length> = row!(MinWidth, "min-width", min_width).animated().layout(lay::min_width);
static MIN_HEIGHT: Field<Length> = row!(MinHeight, "min-height", min_height).animated().layout(lay::min_height);
static MAX_WIDTH: Field<Length> = row!(MaxWidth, "max-width", max_width).animated().layout(lay::max_width);
static MAX_HEIGHT: Field<Length> = row!(MaxHeight, "max-height", max_height).animated().layout(lay::max_height);

static MARGIN: Field<Length> = row!(Margin, "margin", margin).animated();
static MARGIN_TOP: Field<Length> = row!(MarginTop, "margin-top", margin_top).animated().layout(lay::margin_top);
static MARGIN_RIGHT: Field<Length> = row!(MarginRight, "margin-right", margin_right).animated().layout(lay::margin_right);
static MARGIN_BOTTOM: Field<Length> = row!(MarginBottom, "margin-bottom", margin_bottom).animated().layout(lay::margin_bottom);
static MARGIN_LEFT: Field<Length> = row!(MarginLeft, "margin-left", margin_left).animated().layout(lay::margin_left);
static PADDING: Field<Length> = row!(Padding, "padding", padding).animated();
static PADDING_TOP: Field<Length> = row!(PaddingTop, "padding-top", padding_top).animated().layout(lay::padding_top);
static PADDING_RIGHT: Field<Length> = row!(PaddingRight, "padding-right", padding_right).animated().layout(lay::padding_right);
static PADDING_BOTTOM: Field<Length> = row!(PaddingBottom, "padding-bottom", padding_bottom).animated().layout(lay::padding_bottom);
static PADDING_LEFT: Field<Length> = row!(PaddingLeft, "padding-left", padding_left).animated().layout(lay::padding_left);
static BORDER_WIDTH: Field<Length> = row!(BorderWidth, "border-width", border_width).animated();
static BORDER_TOP: Field<Length> = row!(BorderTop, "border-top", border_top).animated().layout(lay::border_top);
static BORDER_RIGHT: Field<Length> = row!(BorderRight, "border-right", border_right).animated().layout(lay::border_right);
static BORDER_BOTTOM: Field<Length> = row!(BorderBottom, "border-bottom", border_bottom).animated().layout(lay::border_bottom);
static BORDER_LEFT: Field<Length> = row!(BorderLeft, "border-left", border_left).animated().layout(lay::border_left);

static DISPLAY: Field<super::value::Display> = row!(Display, "display", display).layout(lay::display);
static FLEX_DIRECTION: Field<super::value::FlexDirection> =
    row!(FlexDirection, "flex-direction", flex_direction).layout(lay::flex_direction);
static JUSTIFY_CONTENT: Field<super::value::Justify> =
    row!(JustifyContent, "justify-content", justify_content).layout(lay::justify_content);
static ALIGN_ITEMS: Field<super::value::Align> = row!(AlignItems, "align-items", align_items).layout(lay::align_items);
static FLEX_GROW: Field<f32> = row!(FlexGrow, "flex-grow", flex_grow).animated().layout(lay::flex_grow);
static FLEX_SHRINK: Field<f32> = row!(FlexShrink, "flex-shrink", flex_shrink).animated().layout(lay::flex_shrink);
static FLEX_BASIS: Field<Length> = row!(FlexBasis, "flex-basis", flex_basis).animated().layout(lay::flex_basis);
static GAP: Field<Length> = row!(Gap, "gap", gap).animated().layout(lay::gap);

static POSITION: Field<super::value::Position> = row!(Position, "position", position).layout(lay::position);
static INSET_TOP: Field<Length> = row!(InsetTop, "top", inset_top).animated().layout(lay::inset_top);
static INSET_RIGHT: Field<Length> = row!(InsetRight, "right", inset_right).animated().layout(lay::inset_right);
static INSET_BOTTOM: Field<Length> = row!(InsetBottom, "bottom", inset_bottom).animated().layout(lay::inset_bottom);
static INSET_LEFT: Field<Length> = row!(InsetLeft, "left", inset_left).animated().layout(lay::inset_left);

/// Every property row, indexed by [`PropertyId`].
pub static PROPERTIES: &[&dyn PropertyAccess] = &[
    &COLOR,
    &BACKGROUND,
    &BORDER_COLOR,
    &OPACITY,
    &CORNER_RADIUS,
    &FONT_FAMILY,
    &FONT_SIZE,
    &FONT_WEIGHT,
    &TRANSLATE_X,
    &TRANSLATE_Y,
    &SCALE,
    &ROTATION,
    &WIDTH,
    &HEIGHT,
    &MIN_WIDTH,
    &MIN_HEIGHT,
    &MAX_WIDTH,
    &MAX_HEIGHT,
    &MARGIN,
    &MARGIN_TOP,
    &MARGIN_RIGHT,
    &MARGIN_BOTTOM,
    &MARGIN_LEFT,
    &PADDING,
    &PADDING_TOP,
    &PADDING_RIGHT,
    &PADDING_BOTTOM,
    &PADDING_LEFT,
    &BORDER_WIDTH,
    &BORDER_TOP,
    &BORDER_RIGHT,
    &BORDER_BOTTOM,
    &BORDER_LEFT,
    &DISPLAY,
    &FLEX_DIRECTION,
    &JUSTIFY_CONTENT,
    &ALIGN_ITEMS,
    &FLEX_GROW,
    &FLEX_SHRINK,
    &FLEX_BASIS,
    &GAP,
    &POSITION,
    &INSET_TOP,
    &INSET_RIGHT,
    &INSET_BOTTOM,
    &INSET_LEFT,
];
