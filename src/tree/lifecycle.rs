//! Node lifecycle: mount and unmount events from reconciliation.
//!
//! The `LifecycleTracker` records which nodes are currently mounted and
//! accumulates `Mount`/`Unmount` events that the host can drain after a pass
//! (e.g. to release resources stashed outside the tree).

use std::collections::HashSet;

use super::node::NodeId;

/// Events that occur during reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A node was created for a new declaration.
    Mount { node_id: NodeId },
    /// A node was destroyed because it was not re-declared (or an ancestor was).
    Unmount { node_id: NodeId },
}

/// Tracks mounted nodes and pending lifecycle events.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    mounted: HashSet<NodeId>,
    pending: Vec<LifecycleEvent>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a node has been mounted. Repeated mounts are ignored.
    pub fn on_mount(&mut self, id: NodeId) {
        if self.mounted.insert(id) {
            self.pending.push(LifecycleEvent::Mount { node_id: id });
        }
    }

    /// Record that a node has been unmounted. Unknown nodes are ignored.
    pub fn on_unmount(&mut self, id: NodeId) {
        if self.mounted.remove(&id) {
            self.pending.push(LifecycleEvent::Unmount { node_id: id });
        }
    }

    pub fn is_mounted(&self, id: NodeId) -> bool {
        self.mounted.contains(&id)
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    /// Drain all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
