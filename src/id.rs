//! Node identity.
//!
//! An [`Id`] is a 64-bit hash that names a declared node among its siblings.
//! Equal inputs give equal ids on every pass, so the reconciler can match a
//! declaration against the node it produced last pass.

use std::any::TypeId;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::Location;

/// Delimiter between display text and key material in a label.
pub const LABEL_DELIMITER: &str = "##";

/// An opaque node identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(u64);

impl Id {
    /// Hash any hashable value.
    pub fn new<T: Hash + ?Sized>(value: &T) -> Self {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        Id(hasher.finish())
    }

    /// Wrap a raw value without hashing.
    pub const fn from_raw(raw: u64) -> Self {
        Id(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Hash a source location (file, line, column).
    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(&(location.file(), location.line(), location.column()))
    }

    /// The id of the calling source location.
    ///
    /// Two calls on the same line and column produce the same id; inside a
    /// loop, derive per-iteration ids with [`Id::with`].
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    /// Hash a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self::new(s)
    }

    /// The id of a type.
    pub fn of_type<T: ?Sized + 'static>() -> Self {
        Self::new(&TypeId::of::<T>())
    }

    /// Derive a new id from this one and `salt` (e.g. a loop index).
    pub fn with(self, salt: impl Hash) -> Self {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        salt.hash(&mut hasher);
        Id(hasher.finish())
    }

    /// Build an id from a type tag and a `"text##key"` label. Returns the id
    /// and the display text.
    pub fn from_label<T: ?Sized + 'static>(label: &str) -> (Self, &str) {
        let (display, key) = split_label(label);
        (Id(Self::of_type::<T>().0 ^ Self::from_str(key).0), display)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({:016x})", self.0)
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Id::new(&value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::from_str(value)
    }
}

/// Split a label into `(display, key_material)`.
///
/// The display text is everything before the first `##`. The key material is
/// everything from the last `##` on, or the whole label when it has no `##`.
///
/// ```
/// use weft::id::split_label;
///
/// assert_eq!(split_label("Save##toolbar"), ("Save", "##toolbar"));
/// assert_eq!(split_label("Save"), ("Save", "Save"));
/// ```
pub fn split_label(label: &str) -> (&str, &str) {
    match (label.find(LABEL_DELIMITER), label.rfind(LABEL_DELIMITER)) {
        (Some(first), Some(last)) => (&label[..first], &label[last..]),
        _ => (label, label),
    }
}
