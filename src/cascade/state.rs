//! Interaction state as seen by selectors.

use crate::tree::{Capabilities, NodeKind, NodeState};

/// A node's effective state: its own flags, plus the parent's hover and
/// active flags when the parent's kind propagates them, plus the parent's
/// `DISABLED`.
///
/// `parent` is the parent's effective state and kind.
pub fn effective_state(own: NodeState, parent: Option<(NodeState, &NodeKind)>) -> NodeState {
    let Some((parent_state, parent_kind)) = parent else {
        return own;
    };
    let mut state = own;
    if parent_kind.has(Capabilities::PROPAGATE_HOVER) && parent_state.contains(NodeState::HOVER) {
        state |= NodeState::HOVER;
    }
    if parent_kind.has(Capabilities::PROPAGATE_ACTIVE) && parent_state.contains(NodeState::ACTIVE) {
        state |= NodeState::ACTIVE;
    }
    if parent_state.contains(NodeState::DISABLED) {
        state |= NodeState::DISABLED;
    }
    state
}
