//! Per-property transitions between successive resolved styles.
//!
//! Each animatable property of a node owns at most one [`TransitionState`]
//! in the node's [`TransitionTable`]. A state is created when the resolved
//! value changes while the property has a transition configured, sampled every
//! frame until its end time, then discarded. A retarget starts from the value
//! currently on screen, not from the old target.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{trace, warn};

use crate::style::descriptor::PropertyId;
use crate::style::easing::Easing;
use crate::style::property::{Animate, AnimatedValue, StyleProperty};

/// A running interpolation for one property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionState {
    pub start: AnimatedValue,
    pub start_time: Instant,
    pub end: AnimatedValue,
    pub end_time: Instant,
    pub easing: Easing,
}

impl TransitionState {
    /// Eased progress in `[0, 1]` at `now`.
    pub fn progress(&self, now: Instant) -> f32 {
        if now <= self.start_time {
            return 0.0;
        }
        if now >= self.end_time {
            return 1.0;
        }
        let total = self.end_time.duration_since(self.start_time).as_secs_f32();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();
        self.easing.evaluate(elapsed / total)
    }

    /// The interpolated value at `now`. Before the start time (during the
    /// delay) this is the start value.
    pub fn sample<T: Animate>(&self, now: Instant) -> Option<T> {
        let start = T::from_animated(&self.start)?;
        if now <= self.start_time {
            return Some(start);
        }
        let end = T::from_animated(&self.end)?;
        start.lerp(&end, self.progress(now))
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now >= self.end_time
    }
}

/// Transition states of one node, keyed by property.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    states: HashMap<PropertyId, TransitionState>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PropertyId) -> Option<&TransitionState> {
        self.states.get(&id)
    }

    pub fn insert(&mut self, id: PropertyId, state: TransitionState) {
        self.states.insert(id, state);
    }

    pub fn remove(&mut self, id: PropertyId) -> Option<TransitionState> {
        self.states.remove(&id)
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.states.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

/// Animate one property.
///
/// `prev` is the property in the previous frame's resolved style and `next`
/// in this frame's. `displayed` starts out equal to `next` and receives the
/// interpolated value while a transition runs. Returns `true` while the
/// property is still animating.
pub fn animate_property<T: Animate>(
    id: PropertyId,
    prev: &StyleProperty<T>,
    next: &StyleProperty<T>,
    displayed: &mut StyleProperty<T>,
    table: &mut TransitionTable,
    now: Instant,
) -> bool {
    let (Some(transition), Some(target)) = (next.transition, next.value.as_ref()) else {
        table.remove(id);
        return false;
    };
    if !target.is_valid() {
        warn!(property = %id, "transition skipped: target value is not animatable");
        table.remove(id);
        return false;
    }

    let previous = prev.value.clone().unwrap_or_else(T::neutral);
    if previous != *target {
        let from = table
            .get(id)
            .and_then(|state| state.sample::<T>(now))
            .unwrap_or(previous);
        if !from.is_valid() || from.lerp(target, 0.0).is_none() {
            warn!(property = %id, "transition skipped: start and end do not interpolate");
            table.remove(id);
            return false;
        }
        if transition.duration.is_zero() {
            table.remove(id);
            return false;
        }
        let Some((start_time, end_time)) = now
            .checked_add(transition.delay)
            .and_then(|start| Some((start, start.checked_add(transition.duration)?)))
        else {
            warn!(property = %id, "transition skipped: timing overflows the clock");
            table.remove(id);
            return false;
        };
        trace!(property = %id, duration = ?transition.duration, "transition started");
        table.insert(
            id,
            TransitionState {
                start: from.into_animated(),
                start_time,
                end: target.clone().into_animated(),
                end_time,
                easing: transition.easing,
            },
        );
    }

    let Some(state) = table.get(id) else {
        return false;
    };
    if state.is_finished(now) {
        trace!(property = %id, "transition finished");
        table.remove(id);
        return false;
    }
    match state.sample::<T>(now) {
        Some(value) => {
            displayed.value = Some(value);
            true
        }
        None => {
            table.remove(id);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::property::Transition;
    use crate::style::value::{Color, Length};
    use std::time::Duration;

    const ID: PropertyId = PropertyId::Opacity;

    fn prop(value: f32, transition: Option<Transition>) -> StyleProperty<f32> {
        StyleProperty {
            value: Some(value),
            transition,
            ..StyleProperty::default()
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Run one frame: returns (displayed value, still animating).
    fn frame(
        prev: &StyleProperty<f32>,
        next: &StyleProperty<f32>,
        table: &mut TransitionTable,
        now: Instant,
    ) -> (f32, bool) {
        let mut displayed = next.clone();
        let running = animate_property(ID, prev, next, &mut displayed, table, now);
        (displayed.value.unwrap_or(f32::NAN), running)
    }

    #[test]
    fn without_transition_value_passes_through() {
        let mut table = TransitionTable::new();
        let t0 = Instant::now();
        let (v, running) = frame(&prop(0.0, None), &prop(1.0, None), &mut table, t0);
        assert_eq!(v, 1.0);
        assert!(!running);
        assert!(table.is_empty());
    }

    #[test]
    fn equal_values_do_not_animate() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::millis(100));
        let (v, running) = frame(&prop(1.0, t), &prop(1.0, t), &mut table, Instant::now());
        assert_eq!(v, 1.0);
        assert!(!running);
    }

    #[test]
    fn linear_midpoint_and_completion() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::millis(1000));
        let t0 = Instant::now();
        let (v0, running) = frame(&prop(0.0, t), &prop(100.0, t), &mut table, t0);
        assert_eq!(v0, 0.0);
        assert!(running);

        let (mid, _) = frame(&prop(100.0, t), &prop(100.0, t), &mut table, t0 + ms(500));
        assert!((mid - 50.0).abs() < 1e-3, "mid = {mid}");

        let (end, running) = frame(&prop(100.0, t), &prop(100.0, t), &mut table, t0 + ms(1000));
        assert_eq!(end, 100.0);
        assert!(!running);
        assert!(table.is_empty());
    }

    #[test]
    fn missing_previous_starts_from_neutral() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::millis(100));
        let t0 = Instant::now();
        let prev = StyleProperty::<f32>::default();
        frame(&prev, &prop(10.0, t), &mut table, t0);
        let (v, _) = frame(&prop(10.0, t), &prop(10.0, t), &mut table, t0 + ms(50));
        assert!((v - 5.0).abs() < 1e-3);
    }

    #[test]
    fn delay_holds_start_value() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::millis(100).with_delay(ms(100)));
        let t0 = Instant::now();
        frame(&prop(0.0, t), &prop(1.0, t), &mut table, t0);
        let (v, running) = frame(&prop(1.0, t), &prop(1.0, t), &mut table, t0 + ms(50));
        assert_eq!(v, 0.0);
        assert!(running);
        let (v, _) = frame(&prop(1.0, t), &prop(1.0, t), &mut table, t0 + ms(150));
        assert!((v - 0.5).abs() < 1e-3);
    }

    #[test]
    fn retarget_starts_from_displayed_value() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::millis(1000));
        let t0 = Instant::now();
        frame(&prop(0.0, t), &prop(100.0, t), &mut table, t0);
        let half = t0 + ms(500);
        let (v, _) = frame(&prop(100.0, t), &prop(0.0, t), &mut table, half);
        assert!((v - 50.0).abs() < 1e-3, "retarget snapped to {v}");
        let state = table.get(ID).copied().unwrap();
        assert_eq!(f32::from_animated(&state.end), Some(0.0));
        let (v, _) = frame(&prop(0.0, t), &prop(0.0, t), &mut table, half + ms(500));
        assert!((v - 25.0).abs() < 1e-3);
    }

    #[test]
    fn nan_target_is_skipped() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::millis(100));
        let (v, running) = frame(&prop(0.0, t), &prop(f32::NAN, t), &mut table, Instant::now());
        assert!(v.is_nan());
        assert!(!running);
        assert!(table.is_empty());
    }

    #[test]
    fn zero_duration_snaps() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::new(Duration::ZERO));
        let (v, running) = frame(&prop(0.0, t), &prop(1.0, t), &mut table, Instant::now());
        assert_eq!(v, 1.0);
        assert!(!running);
    }

    #[test]
    fn unrepresentable_duration_snaps() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::new(Duration::from_secs(u64::MAX)));
        let (v, running) = frame(&prop(0.0, t), &prop(1.0, t), &mut table, Instant::now());
        assert_eq!(v, 1.0);
        assert!(!running);
        assert!(table.is_empty());
    }

    #[test]
    fn mismatched_length_units_snap() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::millis(100));
        let prev = StyleProperty {
            value: Some(Length::Px(10.0)),
            transition: t,
            ..StyleProperty::default()
        };
        let next = StyleProperty {
            value: Some(Length::Percent(50.0)),
            transition: t,
            ..StyleProperty::default()
        };
        let mut displayed = next.clone();
        let running = animate_property(
            PropertyId::Width,
            &prev,
            &next,
            &mut displayed,
            &mut table,
            Instant::now(),
        );
        assert!(!running);
        assert_eq!(displayed.value, Some(Length::Percent(50.0)));
    }

    #[test]
    fn colors_interpolate_per_channel() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::millis(100));
        let prev = StyleProperty {
            value: Some(Color::BLACK),
            transition: t,
            ..StyleProperty::default()
        };
        let next = StyleProperty {
            value: Some(Color::WHITE),
            transition: t,
            ..StyleProperty::default()
        };
        let t0 = Instant::now();
        let mut displayed = next.clone();
        animate_property(PropertyId::Color, &prev, &next, &mut displayed, &mut table, t0);
        let mut displayed = next.clone();
        animate_property(PropertyId::Color, &next, &next, &mut displayed, &mut table, t0 + ms(50));
        let c = displayed.value.unwrap();
        assert!((c.r - 0.5).abs() < 1e-3 && (c.g - 0.5).abs() < 1e-3 && c.a == 1.0);
    }

    #[test]
    fn removing_transition_drops_state() {
        let mut table = TransitionTable::new();
        let t = Some(Transition::millis(100));
        let t0 = Instant::now();
        frame(&prop(0.0, t), &prop(1.0, t), &mut table, t0);
        assert!(table.contains(ID));
        let (v, running) = frame(&prop(1.0, t), &prop(1.0, None), &mut table, t0 + ms(10));
        assert_eq!(v, 1.0);
        assert!(!running);
        assert!(table.is_empty());
    }
}
