//! Node types: NodeId, NodeState, Node.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::cascade::transition::TransitionTable;
use crate::id::Id;
use crate::style::selector::StyleClass;
use crate::style::style::Style;

use super::kind::NodeKind;

new_key_type! {
    /// Unique identifier for a retained node. Copy, lightweight (u64).
    pub struct NodeId;
}

bitflags! {
    /// Interaction state of a node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeState: u8 {
        const HOVER = 1 << 0;
        const ACTIVE = 1 << 1;
        const DISABLED = 1 << 2;
        const FOCUS = 1 << 3;
    }
}

impl NodeState {
    /// The pseudo-classes selectors see for this state. `DISABLED` hides
    /// `HOVER` and `ACTIVE`.
    pub fn pseudo_classes(self) -> impl Iterator<Item = StyleClass> {
        let disabled = self.contains(NodeState::DISABLED);
        [
            (NodeState::HOVER, StyleClass::HOVER, !disabled),
            (NodeState::ACTIVE, StyleClass::ACTIVE, !disabled),
            (NodeState::DISABLED, StyleClass::DISABLED, true),
            (NodeState::FOCUS, StyleClass::FOCUS, true),
        ]
        .into_iter()
        .filter(move |(flag, _, visible)| *visible && self.contains(*flag))
        .map(|(_, class, _)| class)
    }

    /// Whether the state carries the pseudo-class `class`.
    pub fn has_pseudo(self, class: StyleClass) -> bool {
        self.pseudo_classes().any(|c| c == class)
    }
}

/// A retained node.
pub struct Node {
    pub kind: &'static NodeKind,
    /// The identity it was declared with.
    pub key: Option<Id>,
    /// Explicit style for this pass. Reset whenever the node is re-declared.
    pub style: Style,
    /// Extra classes for this pass. Reset whenever the node is re-declared.
    pub classes: Vec<StyleClass>,
    /// Interaction state. Hover, active and focus persist across passes;
    /// `DISABLED` is declared anew each pass.
    pub state: NodeState,
    /// Resolved target style of the last cascade, `None` before the first.
    pub computed: Option<Style>,
    /// What the node shows this frame: `computed` with running transitions
    /// substituted.
    pub displayed: Style,
    pub transitions: TransitionTable,
    /// Classes the last cascade matched, including rule-attached ones.
    pub resolved_classes: Vec<StyleClass>,
    pub created_pass: u64,
    context: HashMap<TypeId, Box<dyn Any>>,
}

impl Node {
    pub fn new(kind: &'static NodeKind, key: Option<Id>, pass: u64) -> Self {
        Self {
            kind,
            key,
            style: Style::new(),
            classes: Vec::new(),
            state: NodeState::empty(),
            computed: None,
            displayed: Style::new(),
            transitions: TransitionTable::new(),
            resolved_classes: Vec::new(),
            created_pass: pass,
            context: HashMap::new(),
        }
    }

    /// Whether a declaration of `kind` with `key` may reuse this node.
    pub fn matches(&self, kind: &NodeKind, key: Option<Id>) -> bool {
        self.kind.is(kind) && self.key == key
    }

    /// Forget the previous pass's declaration data.
    pub(crate) fn redeclare(&mut self) {
        self.style = Style::new();
        self.classes.clear();
        self.state.remove(NodeState::DISABLED);
    }

    pub fn add_class(&mut self, class: StyleClass) {
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    /// Whether the node carries `class` as declared or as resolved by the last cascade.
    pub fn has_class(&self, class: StyleClass) -> bool {
        self.kind.class == class || self.classes.contains(&class) || self.resolved_classes.contains(&class)
    }

    pub fn is_disabled(&self) -> bool {
        self.state.contains(NodeState::DISABLED)
    }

    // -- Context ------------------------------------------------------------

    /// Store a per-node value, replacing any value of the same type.
    pub fn set_context<T: Any>(&mut self, value: T) {
        self.context.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn context<T: Any>(&self) -> Option<&T> {
        self.context
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref::<T>())
    }

    pub fn context_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.context
            .get_mut(&TypeId::of::<T>())
            .and_then(|b| b.downcast_mut::<T>())
    }

    /// The stored value of type `T`, inserting `T::default()` first if absent.
    pub fn context_or_default<T: Any + Default>(&mut self) -> &mut T {
        if !self.context.contains_key(&TypeId::of::<T>()) {
            self.set_context(T::default());
        }
        // The entry exists and has type `T`.
        match self.context_mut::<T>() {
            Some(value) => value,
            None => unreachable!("context entry for a TypeId always has that type"),
        }
    }

    pub fn take_context<T: Any>(&mut self) -> Option<T> {
        self.context
            .remove(&TypeId::of::<T>())
            .and_then(|b| b.downcast::<T>().ok())
            .map(|b| *b)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind.name)
            .field("key", &self.key)
            .field("state", &self.state)
            .field("classes", &self.classes)
            .field("created_pass", &self.created_pass)
            .finish_non_exhaustive()
    }
}
