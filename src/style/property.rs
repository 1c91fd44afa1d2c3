//! The generic style property container and the interpolation trait.

use std::time::Duration;

use super::easing::Easing;
use super::value::{Color, Length};

/// How far a property value reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Applies to the node that declared it.
    #[default]
    SelfOnly,
    /// Applies to the node and is inherited by every descendant until overridden.
    SelfAndDescendants,
}

/// An animation descriptor attached to a property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Transition {
    /// A transition of the given length with no delay and a linear curve.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing: Easing::Linear,
        }
    }

    /// Shorthand for [`Transition::new`] in milliseconds.
    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Set the start delay (builder).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the easing curve (builder).
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// One property slot of a [`Style`](super::Style).
///
/// `value: None` means "not set": the slot neither overrides lower layers
/// during a merge nor reaches layout.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleProperty<T> {
    pub value: Option<T>,
    pub transition: Option<Transition>,
    pub scope: Scope,
}

impl<T> Default for StyleProperty<T> {
    fn default() -> Self {
        Self {
            value: None,
            transition: None,
            scope: Scope::SelfOnly,
        }
    }
}

impl<T: Clone> StyleProperty<T> {
    /// An unset property.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value, keeping transition and scope.
    pub fn set(&mut self, value: T) -> &mut Self {
        self.value = Some(value);
        self
    }

    /// Attach a transition.
    pub fn transition(&mut self, transition: Transition) -> &mut Self {
        self.transition = Some(transition);
        self
    }

    /// Mark the value as inherited by descendants.
    pub fn inherit(&mut self) -> &mut Self {
        self.scope = Scope::SelfAndDescendants;
        self
    }

    /// The value, if set.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Whether a value is present.
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Whether descendants may pick this value up.
    pub fn is_inherited(&self) -> bool {
        self.is_set() && self.scope == Scope::SelfAndDescendants
    }

    /// Cascade `other` on top of `self`: when `other` has a value, it replaces
    /// this slot's value, transition and scope.
    pub fn merge_from(&mut self, other: &StyleProperty<T>) {
        if other.value.is_some() {
            self.value.clone_from(&other.value);
            self.transition = other.transition;
            self.scope = other.scope;
        }
    }

    /// Clear the slot.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// A value the transition engine can interpolate.
pub trait Animate: Clone + PartialEq {
    /// Start value used when a property had no previous value.
    fn neutral() -> Self;

    /// Interpolate towards `to` by `t` (0 = self, 1 = to).
    ///
    /// Returns `None` when the pair cannot be interpolated; the caller then
    /// snaps to the target.
    fn lerp(&self, to: &Self, t: f32) -> Option<Self>;

    /// `false` for values (NaN, mismatched units) that must not animate.
    fn is_valid(&self) -> bool {
        true
    }

    /// Type-erase into an [`AnimatedValue`] for storage in transition tables.
    fn into_animated(self) -> AnimatedValue;

    /// Recover a typed value from the erased form.
    fn from_animated(value: &AnimatedValue) -> Option<Self>;
}

/// Type-erased animatable value stored in transition state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatedValue {
    Number(f32),
    Length(Length),
    Color(Color),
}

#[inline]
fn lerp_f32(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Animate for f32 {
    fn neutral() -> Self {
        0.0
    }

    fn lerp(&self, to: &Self, t: f32) -> Option<Self> {
        Some(lerp_f32(*self, *to, t))
    }

    fn is_valid(&self) -> bool {
        !self.is_nan()
    }

    fn into_animated(self) -> AnimatedValue {
        AnimatedValue::Number(self)
    }

    fn from_animated(value: &AnimatedValue) -> Option<Self> {
        match value {
            AnimatedValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl Animate for Length {
    fn neutral() -> Self {
        Length::ZERO
    }

    fn lerp(&self, to: &Self, t: f32) -> Option<Self> {
        if !self.same_unit(to) {
            return None;
        }
        let (from_v, to_v) = (self.value()?, to.value()?);
        Some(to.with_value(lerp_f32(from_v, to_v, t)))
    }

    fn is_valid(&self) -> bool {
        self.value().is_some_and(|v| !v.is_nan())
    }

    fn into_animated(self) -> AnimatedValue {
        AnimatedValue::Length(self)
    }

    fn from_animated(value: &AnimatedValue) -> Option<Self> {
        match value {
            AnimatedValue::Length(v) => Some(*v),
            _ => None,
        }
    }
}

impl Animate for Color {
    fn neutral() -> Self {
        Color::TRANSPARENT
    }

    fn lerp(&self, to: &Self, t: f32) -> Option<Self> {
        Some(Color {
            r: lerp_f32(self.r, to.r, t),
            g: lerp_f32(self.g, to.g, t),
            b: lerp_f32(self.b, to.b, t),
            a: lerp_f32(self.a, to.a, t),
        })
    }

    fn is_valid(&self) -> bool {
        !(self.r.is_nan() || self.g.is_nan() || self.b.is_nan() || self.a.is_nan())
    }

    fn into_animated(self) -> AnimatedValue {
        AnimatedValue::Color(self)
    }

    fn from_animated(value: &AnimatedValue) -> Option<Self> {
        match value {
            AnimatedValue::Color(v) => Some(*v),
            _ => None,
        }
    }
}
