//! Per-depth reconciliation state.

use crate::tree::{NodeId, NodeKind};

/// A sibling the session declares right after a node once it closes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Attachment {
    pub kind: &'static NodeKind,
    pub text: String,
}

/// One open `begin`: the node being declared into and the reuse cursor over
/// its children from the previous pass.
#[derive(Debug)]
pub(crate) struct StackFrame {
    pub node: NodeId,
    pub kind: &'static NodeKind,
    /// Children declared so far this pass, in call order.
    pub declared: Vec<NodeId>,
    /// The node's children as of the previous pass.
    pub previous: Vec<NodeId>,
    /// Index into `previous` of the next slot a declaration may reuse.
    pub cursor: usize,
    /// Captions and tooltips queued while the node was still open.
    pub attachments: Vec<Attachment>,
}

impl StackFrame {
    pub fn new(node: NodeId, kind: &'static NodeKind, previous: Vec<NodeId>) -> Self {
        Self {
            node,
            kind,
            declared: Vec::new(),
            previous,
            cursor: 0,
            attachments: Vec::new(),
        }
    }

    /// The previous-pass child at the reuse cursor, if any.
    pub fn next_slot(&self) -> Option<NodeId> {
        self.previous.get(self.cursor).copied()
    }

    /// Drop every previous-pass slot from the cursor on and return them.
    pub fn truncate(&mut self) -> Vec<NodeId> {
        self.previous.split_off(self.cursor.min(self.previous.len()))
    }
}
