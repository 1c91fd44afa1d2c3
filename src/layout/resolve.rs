//! Style -> taffy Style conversion.
//!
//! Every layout-relevant property row in [`PROPERTIES`] carries one of the
//! setters below; [`resolve_style`] walks the table and lets each set property
//! write its slot of the [`taffy::Style`]. Unset properties keep taffy's
//! defaults.

use taffy::prelude::*;

use crate::style::descriptor::PROPERTIES;
use crate::style::style::Style;
use crate::style::value as v;

/// Viewport size used to resolve `vw` and `vh`.
pub type Viewport = taffy::geometry::Size<f32>;

/// Convert a [`Length`](v::Length) to a [`LengthPercentageAuto`], resolving
/// viewport-relative units against `viewport`.
///
/// - `Px` -> length
/// - `Percent` -> percent (0..100 range mapped to 0..1)
/// - `Vw`/`Vh` -> resolved to an absolute length
/// - `Auto` -> auto
pub fn resolve_length(length: &v::Length, viewport: Viewport) -> LengthPercentageAuto {
    match *length {
        v::Length::Px(px) => LengthPercentageAuto::from_length(px),
        v::Length::Percent(p) => LengthPercentageAuto::from_percent(p / 100.0),
        v::Length::Vw(n) => LengthPercentageAuto::from_length(n / 100.0 * viewport.width),
        v::Length::Vh(n) => LengthPercentageAuto::from_length(n / 100.0 * viewport.height),
        v::Length::Auto => LengthPercentageAuto::AUTO,
    }
}

/// Convert a [`Length`](v::Length) for contexts without auto (padding,
/// border, gap). `Auto` maps to zero.
pub fn resolve_length_definite(length: &v::Length, viewport: Viewport) -> LengthPercentage {
    match *length {
        v::Length::Px(px) => LengthPercentage::from_length(px),
        v::Length::Percent(p) => LengthPercentage::from_percent(p / 100.0),
        v::Length::Vw(n) => LengthPercentage::from_length(n / 100.0 * viewport.width),
        v::Length::Vh(n) => LengthPercentage::from_length(n / 100.0 * viewport.height),
        v::Length::Auto => LengthPercentage::ZERO,
    }
}

/// Convert a [`Length`](v::Length) to a [`Dimension`] for sizing contexts.
pub fn resolve_dimension(length: &v::Length, viewport: Viewport) -> Dimension {
    match *length {
        v::Length::Px(px) => Dimension::from_length(px),
        v::Length::Percent(p) => Dimension::from_percent(p / 100.0),
        v::Length::Vw(n) => Dimension::from_length(n / 100.0 * viewport.width),
        v::Length::Vh(n) => Dimension::from_length(n / 100.0 * viewport.height),
        v::Length::Auto => Dimension::AUTO,
    }
}

/// Build the solver style for a resolved [`Style`].
pub fn resolve_style(style: &Style, viewport: Viewport) -> taffy::Style {
    let mut out = taffy::Style::default();
    for property in PROPERTIES {
        property.apply_layout(style, &mut out, viewport);
    }
    out
}

// ---------------------------------------------------------------------------
// Per-property setters
// ---------------------------------------------------------------------------

macro_rules! setter {
    ($name:ident, $ty:ty, |$value:ident, $out:ident, $viewport:ident| $body:expr) => {
        pub fn $name($value: &$ty, $out: &mut taffy::Style, $viewport: Viewport) {
            let _ = $viewport;
            $body;
        }
    };
}

setter!(width, v::Length, |value, out, viewport| out.size.width = resolve_dimension(value, viewport));
setter!(height, v::Length, |value, out, viewport| out.size.height = resolve_dimension(value, viewport));
setter!(min_width, v::Length, |value, out, viewport| out.min_size.width = resolve_dimension(value, viewport));
setter!(min_height, v::Length, |value, out, viewport| out.min_size.height = resolve_dimension(value, viewport));
setter!(max_width, v::Length, |value, out, viewport| out.max_size.width = resolve_dimension(value, viewport));
setter!(max_height, v::Length, |value, out, viewport| out.max_size.height = resolve_dimension(value, viewport));

setter!(margin_top, v::Length, |value, out, viewport| out.margin.top = resolve_length(value, viewport));
setter!(margin_right, v::Length, |value, out, viewport| out.margin.right = resolve_length(value, viewport));
setter!(margin_bottom, v::Length, |value, out, viewport| out.margin.bottom = resolve_length(value, viewport));
setter!(margin_left, v::Length, |value, out, viewport| out.margin.left = resolve_length(value, viewport));

setter!(padding_top, v::Length, |value, out, viewport| out.padding.top = resolve_length_definite(value, viewport));
setter!(padding_right, v::Length, |value, out, viewport| out.padding.right = resolve_length_definite(value, viewport));
setter!(padding_bottom, v::Length, |value, out, viewport| out.padding.bottom = resolve_length_definite(value, viewport));
setter!(padding_left, v::Length, |value, out, viewport| out.padding.left = resolve_length_definite(value, viewport));

setter!(border_top, v::Length, |value, out, viewport| out.border.top = resolve_length_definite(value, viewport));
setter!(border_right, v::Length, |value, out, viewport| out.border.right = resolve_length_definite(value, viewport));
setter!(border_bottom, v::Length, |value, out, viewport| out.border.bottom = resolve_length_definite(value, viewport));
setter!(border_left, v::Length, |value, out, viewport| out.border.left = resolve_length_definite(value, viewport));

setter!(inset_top, v::Length, |value, out, viewport| out.inset.top = resolve_length(value, viewport));
setter!(inset_right, v::Length, |value, out, viewport| out.inset.right = resolve_length(value, viewport));
setter!(inset_bottom, v::Length, |value, out, viewport| out.inset.bottom = resolve_length(value, viewport));
setter!(inset_left, v::Length, |value, out, viewport| out.inset.left = resolve_length(value, viewport));

setter!(flex_basis, v::Length, |value, out, viewport| out.flex_basis = resolve_dimension(value, viewport));
setter!(flex_grow, f32, |value, out, viewport| out.flex_grow = (*value).max(0.0));
setter!(flex_shrink, f32, |value, out, viewport| out.flex_shrink = (*value).max(0.0));

/// Gap applies to both axes.
pub fn gap(value: &v::Length, out: &mut taffy::Style, viewport: Viewport) {
    let gap = resolve_length_definite(value, viewport);
    out.gap = taffy::geometry::Size {
        width: gap,
        height: gap,
    };
}

pub fn display(value: &v::Display, out: &mut taffy::Style, _viewport: Viewport) {
    out.display = match value {
        v::Display::Flex => Display::Flex,
        v::Display::None => Display::None,
    };
}

pub fn flex_direction(value: &v::FlexDirection, out: &mut taffy::Style, _viewport: Viewport) {
    out.flex_direction = match value {
        v::FlexDirection::Row => FlexDirection::Row,
        v::FlexDirection::Column => FlexDirection::Column,
        v::FlexDirection::RowReverse => FlexDirection::RowReverse,
        v::FlexDirection::ColumnReverse => FlexDirection::ColumnReverse,
    };
}

pub fn justify_content(value: &v::Justify, out: &mut taffy::Style, _viewport: Viewport) {
    out.justify_content = Some(match value {
        v::Justify::Start => JustifyContent::Start,
        v::Justify::End => JustifyContent::End,
        v::Justify::Center => JustifyContent::Center,
        v::Justify::SpaceBetween => JustifyContent::SpaceBetween,
        v::Justify::SpaceAround => JustifyContent::SpaceAround,
        v::Justify::SpaceEvenly => JustifyContent::SpaceEvenly,
    });
}

pub fn align_items(value: &v::Align, out: &mut taffy::Style, _viewport: Viewport) {
    out.align_items = Some(match value {
        v::Align::Start => AlignItems::Start,
        v::Align::End => AlignItems::End,
        v::Align::Center => AlignItems::Center,
        v::Align::Stretch => AlignItems::Stretch,
        v::Align::Baseline => AlignItems::Baseline,
    });
}

pub fn position(value: &v::Position, out: &mut taffy::Style, _viewport: Viewport) {
    out.position = match value {
        v::Position::Relative => Position::Relative,
        v::Position::Absolute => Position::Absolute,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::value::Length;

    const VIEWPORT: Viewport = taffy::geometry::Size {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn length_units() {
        assert_eq!(
            resolve_length(&Length::Px(12.0), VIEWPORT),
            LengthPercentageAuto::from_length(12.0)
        );
        assert_eq!(
            resolve_length(&Length::Percent(50.0), VIEWPORT),
            LengthPercentageAuto::from_percent(0.5)
        );
        assert_eq!(
            resolve_length(&Length::Vw(10.0), VIEWPORT),
            LengthPercentageAuto::from_length(80.0)
        );
        assert_eq!(
            resolve_length(&Length::Vh(10.0), VIEWPORT),
            LengthPercentageAuto::from_length(60.0)
        );
        assert_eq!(resolve_length(&Length::Auto, VIEWPORT), LengthPercentageAuto::AUTO);
    }

    #[test]
    fn definite_auto_is_zero() {
        assert_eq!(
            resolve_length_definite(&Length::Auto, VIEWPORT),
            LengthPercentage::ZERO
        );
    }

    #[test]
    fn empty_style_keeps_solver_defaults() {
        assert_eq!(resolve_style(&Style::new(), VIEWPORT), taffy::Style::default());
    }

    #[test]
    fn size_and_flex() {
        let style = Style::new().with(|s| {
            s.width.set(Length::Px(100.0));
            s.height.set(Length::Percent(25.0));
            s.flex_direction.set(v::FlexDirection::Row);
            s.flex_grow.set(2.0);
            s.gap.set(Length::Px(4.0));
            s.justify_content.set(v::Justify::Center);
        });
        let out = resolve_style(&style, VIEWPORT);
        assert_eq!(out.size.width, Dimension::from_length(100.0));
        assert_eq!(out.size.height, Dimension::from_percent(0.25));
        assert_eq!(out.flex_direction, FlexDirection::Row);
        assert_eq!(out.flex_grow, 2.0);
        assert_eq!(out.gap.width, LengthPercentage::from_length(4.0));
        assert_eq!(out.gap.height, LengthPercentage::from_length(4.0));
        assert_eq!(out.justify_content, Some(JustifyContent::Center));
    }

    #[test]
    fn flattened_edges_reach_the_solver() {
        let mut style = Style::new().with(|s| {
            s.padding.set(Length::Px(2.0));
            s.padding_left.set(Length::Px(6.0));
        });
        style.flatten_edges();
        let out = resolve_style(&style, VIEWPORT);
        assert_eq!(out.padding.top, LengthPercentage::from_length(2.0));
        assert_eq!(out.padding.left, LengthPercentage::from_length(6.0));
    }

    #[test]
    fn display_none_and_absolute() {
        let style = Style::new().with(|s| {
            s.display.set(v::Display::None);
            s.position.set(v::Position::Absolute);
            s.inset_top.set(Length::Px(3.0));
        });
        let out = resolve_style(&style, VIEWPORT);
        assert_eq!(out.display, Display::None);
        assert_eq!(out.position, Position::Absolute);
        assert_eq!(out.inset.top, LengthPercentageAuto::from_length(3.0));
        assert_eq!(out.inset.bottom, LengthPercentageAuto::AUTO);
    }

    #[test]
    fn paint_properties_do_not_affect_layout() {
        let style = Style::new().with(|s| {
            s.color.set(v::Color::RED);
            s.opacity.set(0.5);
        });
        assert_eq!(resolve_style(&style, VIEWPORT), taffy::Style::default());
    }
}
