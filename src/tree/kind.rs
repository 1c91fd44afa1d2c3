//! Node kinds and their capabilities.

use std::fmt;

use bitflags::bitflags;

use crate::style::selector::StyleClass;
use crate::style::style::Style;
use crate::style::value::Length;

bitflags! {
    /// What a node kind supports, queried instead of inspecting concrete types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        const FOCUSABLE = 1 << 0;
        const TOGGLEABLE = 1 << 1;
        const INVOKABLE = 1 << 2;
        const SELECTABLE = 1 << 3;
        /// Children see this node's hover as their own.
        const PROPAGATE_HOVER = 1 << 4;
        /// Children see this node's active state as their own.
        const PROPAGATE_ACTIVE = 1 << 5;
    }
}

/// How many children a kind accepts per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildLimit {
    Leaf,
    Single,
    Many,
}

/// Static description of a node type.
///
/// Kinds are compared by address: declare each one as a `static`.
///
/// ```
/// use weft::tree::{Capabilities, ChildLimit, NodeKind};
/// use weft::style::Style;
///
/// static BADGE: NodeKind = NodeKind::new("Badge", ChildLimit::Leaf)
///     .with_capabilities(Capabilities::SELECTABLE);
///
/// assert_eq!(BADGE.name, "Badge");
/// assert!(BADGE.has(Capabilities::SELECTABLE));
/// assert!(!BADGE.accepts_children());
/// ```
pub struct NodeKind {
    pub name: &'static str,
    /// Every node of this kind carries this class, so type selectors are
    /// ordinary class selectors.
    pub class: StyleClass,
    pub capabilities: Capabilities,
    /// The kind's intrinsic appearance, merged right above the baseline.
    pub builtin: fn() -> Style,
    pub child_limit: ChildLimit,
}

impl NodeKind {
    pub const fn new(name: &'static str, child_limit: ChildLimit) -> Self {
        Self {
            name,
            class: StyleClass::new(name),
            capabilities: Capabilities::empty(),
            builtin: Style::new,
            child_limit,
        }
    }

    pub const fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub const fn with_builtin(mut self, builtin: fn() -> Style) -> Self {
        self.builtin = builtin;
        self
    }

    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn accepts_children(&self) -> bool {
        self.child_limit != ChildLimit::Leaf
    }

    /// Whether `self` and `other` are the same static kind.
    pub fn is(&self, other: &NodeKind) -> bool {
        std::ptr::eq(self, other)
    }
}

impl PartialEq for NodeKind {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for NodeKind {}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeKind")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .field("child_limit", &self.child_limit)
            .finish()
    }
}

fn root_style() -> Style {
    Style::new().with(|s| {
        s.width.set(Length::Percent(100.0));
        s.height.set(Length::Percent(100.0));
    })
}

/// The implicit root every pass declares into. It fills the viewport.
pub static ROOT: NodeKind = NodeKind::new("Root", ChildLimit::Many).with_builtin(root_style);
