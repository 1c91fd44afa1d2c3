//! The reconciliation session.
//!
//! A [`Session`] owns the retained tree and replays the caller's declaration
//! calls against it once per pass. Each `begin` either reuses the node at the
//! parent's reuse cursor (same kind, same key) or, on the first mismatch,
//! destroys that slot and every later slot of the previous pass before
//! creating a fresh node. `end` commits the declared children as a batch.
//!
//! ```
//! use weft::build::{Session, SessionConfig};
//! use weft::id::Id;
//! use weft::widgets::{self, CONTAINER};
//!
//! let mut session = Session::new(SessionConfig::default());
//! for _ in 0..2 {
//!     session.begin_pass();
//!     session.begin(&CONTAINER, Id::from_str("list"));
//!     widgets::label(&mut session, "Hello##greeting");
//!     session.end(&CONTAINER);
//!     session.end_pass();
//! }
//! assert_eq!(session.stats().created, 0);
//! assert_eq!(session.stats().reused, 2);
//! ```

use std::collections::HashSet;
use std::time::Instant;

use tracing::{debug, trace};

use crate::cascade::Cascade;
use crate::error::BuildError;
use crate::geometry::{Rect, Size};
use crate::id::Id;
use crate::style::sheet::StyleSheet;
use crate::style::style::Style;
use crate::tree::{
    Capabilities, ChildLimit, LifecycleEvent, LifecycleTracker, Node, NodeId, NodeKind, NodeState,
    Tree, ROOT,
};
use crate::widgets::Text;

use super::config::SessionConfig;
use super::frame::{Attachment, StackFrame};
use super::response::Response;

/// Reconciliation counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub created: usize,
    pub reused: usize,
    pub destroyed: usize,
}

/// Owns the tree and drives declaration passes, cascades and layout.
pub struct Session {
    tree: Tree,
    root: Option<NodeId>,
    frames: Vec<StackFrame>,
    pass: u64,
    pass_open: bool,
    stats: PassStats,
    lifecycle: LifecycleTracker,
    config: SessionConfig,
    /// `config.sheet` as a rules-only style, rebuilt when the sheet changes.
    sheet_style: Style,
    focused: Option<NodeId>,
    activations: HashSet<NodeId>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let sheet_style = config.sheet.to_style();
        Self {
            tree: Tree::new(),
            root: None,
            frames: Vec::new(),
            pass: 0,
            pass_open: false,
            stats: PassStats::default(),
            lifecycle: LifecycleTracker::new(),
            config,
            sheet_style,
            focused: None,
            activations: HashSet::new(),
        }
    }

    // -- Passes -------------------------------------------------------------

    /// Open a declaration pass. Declarations go under the root until the
    /// matching [`end_pass`](Self::end_pass).
    pub fn try_begin_pass(&mut self) -> Result<(), BuildError> {
        if self.pass_open {
            return Err(BuildError::PassAlreadyOpen);
        }
        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.tree.insert(&ROOT, None, None, self.pass)?;
                self.lifecycle.on_mount(root);
                self.root = Some(root);
                root
            }
        };
        self.pass += 1;
        self.stats = PassStats::default();
        let previous = self.tree.children(root).to_vec();
        self.frames.push(StackFrame::new(root, &ROOT, previous));
        self.pass_open = true;
        trace!(pass = self.pass, "pass opened");
        Ok(())
    }

    /// Close the pass and return its counters.
    ///
    /// Frames left open are closed as if `end` had been called for each, so
    /// the tree stays consistent, and the pass reports
    /// [`BuildError::Unbalanced`].
    pub fn try_end_pass(&mut self) -> Result<PassStats, BuildError> {
        if !self.pass_open {
            return Err(BuildError::NoPass);
        }
        let open = self.frames.len().saturating_sub(1);
        while self.frames.len() > 1 {
            let Some(frame) = self.frames.pop() else {
                break;
            };
            let node = frame.node;
            debug!(node = ?node, kind = frame.kind.name, "closing frame left open");
            let attachments = self.close_frame(frame)?;
            self.top_mut()?.cursor += 1;
            for attachment in attachments {
                self.declare_attachment(node, attachment)?;
            }
        }
        if let Some(root) = self.frames.pop() {
            self.close_frame(root)?;
        }
        self.pass_open = false;
        self.activations.clear();
        debug!(
            pass = self.pass,
            created = self.stats.created,
            reused = self.stats.reused,
            destroyed = self.stats.destroyed,
            "pass complete"
        );
        if open > 0 {
            return Err(BuildError::Unbalanced { open });
        }
        Ok(self.stats)
    }

    /// Panicking form of [`try_begin_pass`](Self::try_begin_pass).
    pub fn begin_pass(&mut self) {
        if let Err(err) = self.try_begin_pass() {
            panic!("{err}");
        }
    }

    /// Panicking form of [`try_end_pass`](Self::try_end_pass).
    pub fn end_pass(&mut self) -> PassStats {
        match self.try_end_pass() {
            Ok(stats) => stats,
            Err(err) => panic!("{err}"),
        }
    }

    // -- Declarations -------------------------------------------------------

    /// Declare a node of `kind` with `key` as the next child of the open
    /// node and open it for children.
    pub fn try_begin(
        &mut self,
        kind: &'static NodeKind,
        key: impl Into<Option<Id>>,
    ) -> Result<NodeId, BuildError> {
        let key = key.into();
        let (parent, slot) = {
            let frame = self.frames.last().ok_or(BuildError::NoPass)?;
            match frame.kind.child_limit {
                ChildLimit::Leaf => {
                    return Err(BuildError::ChildOfLeaf {
                        parent: frame.kind.name,
                    })
                }
                ChildLimit::Single if !frame.declared.is_empty() => {
                    return Err(BuildError::TooManyChildren {
                        parent: frame.kind.name,
                    })
                }
                _ => {}
            }
            (frame.node, frame.next_slot())
        };

        let reused = slot.filter(|&id| self.tree.get(id).is_some_and(|n| n.matches(kind, key)));
        let id = match reused {
            Some(id) => {
                if let Some(node) = self.tree.get_mut(id) {
                    node.redeclare();
                }
                self.stats.reused += 1;
                id
            }
            None => {
                let stale = self.top_mut()?.truncate();
                for id in stale {
                    self.destroy(id);
                }
                let id = self.tree.insert(kind, key, Some(parent), self.pass)?;
                self.stats.created += 1;
                self.lifecycle.on_mount(id);
                debug!(node = ?id, kind = kind.name, key = ?key, "created node");
                id
            }
        };

        self.top_mut()?.declared.push(id);
        let previous = self.tree.children(id).to_vec();
        self.frames.push(StackFrame::new(id, kind, previous));
        Ok(id)
    }

    /// Close the node opened by the matching `begin(kind, ..)`.
    pub fn try_end(&mut self, kind: &'static NodeKind) -> Result<NodeId, BuildError> {
        if !self.pass_open {
            return Err(BuildError::NoPass);
        }
        if self.frames.len() <= 1 {
            return Err(BuildError::EndWithoutBegin { kind: kind.name });
        }
        let open = self.frames.last().map(|f| f.kind).unwrap_or(&ROOT);
        if !open.is(kind) {
            return Err(BuildError::KindMismatch {
                expected: open.name,
                found: kind.name,
            });
        }

        let Some(frame) = self.frames.pop() else {
            unreachable!("frame count checked above");
        };
        let node = frame.node;
        let attachments = self.close_frame(frame)?;
        self.top_mut()?.cursor += 1;
        for attachment in attachments {
            self.declare_attachment(node, attachment)?;
        }
        Ok(node)
    }

    /// Panicking form of [`try_begin`](Self::try_begin).
    pub fn begin(&mut self, kind: &'static NodeKind, key: impl Into<Option<Id>>) -> NodeId {
        match self.try_begin(kind, key) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    /// Panicking form of [`try_end`](Self::try_end).
    pub fn end(&mut self, kind: &'static NodeKind) -> NodeId {
        match self.try_end(kind) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    /// `begin` wrapped in a [`Response`] that still owes the `end`.
    pub fn declare(&mut self, kind: &'static NodeKind, key: impl Into<Option<Id>>) -> Response<'_> {
        let node = self.begin(kind, key);
        Response::open(self, kind, node, ())
    }

    /// Declare a conditionally shown node.
    ///
    /// When `shown` is false nothing is declared, the response carries
    /// `false`, and its scope guard never calls `end`.
    pub fn begin_if(
        &mut self,
        kind: &'static NodeKind,
        key: impl Into<Option<Id>>,
        shown: bool,
    ) -> Response<'_, bool> {
        if shown {
            let node = self.begin(kind, key);
            Response::open(self, kind, node, true)
        } else {
            Response::hidden(self, kind, false)
        }
    }

    /// Destroy undeclared leftovers and commit the declared children.
    /// Returns the frame's queued attachments.
    fn close_frame(&mut self, mut frame: StackFrame) -> Result<Vec<Attachment>, BuildError> {
        for id in frame.truncate() {
            self.destroy(id);
        }
        let declared = std::mem::take(&mut frame.declared);
        if self.tree.set_children(frame.node, declared)? {
            trace!(node = ?frame.node, "children changed");
        }
        Ok(frame.attachments)
    }

    fn destroy(&mut self, id: NodeId) {
        let removed = self.tree.remove(id);
        for gone in &removed {
            self.lifecycle.on_unmount(*gone);
            self.activations.remove(gone);
            if self.focused == Some(*gone) {
                self.focused = None;
            }
        }
        self.stats.destroyed += removed.len();
        debug!(node = ?id, count = removed.len(), "destroyed subtree");
    }

    fn top_mut(&mut self) -> Result<&mut StackFrame, BuildError> {
        self.frames.last_mut().ok_or(BuildError::NoPass)
    }

    /// Attach a caption or tooltip sibling to `owner`. While `owner` is still
    /// open the sibling is queued until its `end`; otherwise it is declared
    /// right away as the next sibling.
    pub(crate) fn attach(
        &mut self,
        owner: NodeId,
        kind: &'static NodeKind,
        text: String,
    ) -> Result<(), BuildError> {
        let attachment = Attachment { kind, text };
        let still_open = self.frames.len() > 1 && self.current() == Some(owner);
        if still_open {
            self.top_mut()?.attachments.push(attachment);
            Ok(())
        } else {
            self.declare_attachment(owner, attachment)
        }
    }

    fn declare_attachment(&mut self, owner: NodeId, attachment: Attachment) -> Result<(), BuildError> {
        let key = self
            .tree
            .get(owner)
            .and_then(|n| n.key)
            .map(|k| k.with(attachment.kind.name));
        let id = self.try_begin(attachment.kind, key)?;
        if let Some(node) = self.tree.get_mut(id) {
            node.set_context(Text(attachment.text));
        }
        self.try_end(attachment.kind)?;
        Ok(())
    }

    // -- Cascade and layout -------------------------------------------------

    /// Run the style cascade over the whole tree at time `now`. Returns
    /// `true` while any transition is still running.
    pub fn compute_styles(&mut self, now: Instant) -> bool {
        let cascade = Cascade {
            baseline: &self.config.baseline,
            sheet: &self.sheet_style,
            viewport: self.config.viewport.into(),
            now,
        };
        cascade.run(&mut self.tree)
    }

    /// Lay out the tree inside `available`.
    pub fn compute_layout(&mut self, available: Size) -> Result<(), BuildError> {
        self.tree.compute_layout(available)?;
        Ok(())
    }

    /// The last computed box of `node`, relative to its parent.
    pub fn layout(&self, node: NodeId) -> Option<Rect> {
        self.tree.layout(node)
    }

    // -- Interaction state --------------------------------------------------

    /// Set or clear state flags on `node`. Unknown nodes are ignored.
    pub fn set_state(&mut self, node: NodeId, flags: NodeState, on: bool) {
        if let Some(node) = self.tree.get_mut(node) {
            node.state.set(flags, on);
        }
    }

    pub fn set_hovered(&mut self, node: NodeId, hovered: bool) {
        self.set_state(node, NodeState::HOVER, hovered);
    }

    pub fn set_pressed(&mut self, node: NodeId, pressed: bool) {
        self.set_state(node, NodeState::ACTIVE, pressed);
    }

    /// Move focus to `node`. Fails for kinds without
    /// [`Capabilities::FOCUSABLE`] and for disabled nodes.
    pub fn focus(&mut self, node: NodeId) -> bool {
        let focusable = self
            .tree
            .get(node)
            .is_some_and(|n| n.kind.has(Capabilities::FOCUSABLE));
        if !focusable || self.is_disabled(node) {
            return false;
        }
        self.blur();
        self.set_state(node, NodeState::FOCUS, true);
        self.focused = Some(node);
        true
    }

    pub fn blur(&mut self) {
        if let Some(previous) = self.focused.take() {
            self.set_state(previous, NodeState::FOCUS, false);
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Whether `node` or any of its ancestors is disabled.
    pub fn is_disabled(&self, node: NodeId) -> bool {
        std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .any(|id| self.tree.get(id).is_some_and(Node::is_disabled))
    }

    /// Record an activation of `node` (a click or key press), reported by
    /// the node's widget during the next pass. Only enabled
    /// [`Capabilities::INVOKABLE`] nodes can be activated.
    pub fn activate(&mut self, node: NodeId) -> bool {
        let invokable = self
            .tree
            .get(node)
            .is_some_and(|n| n.kind.has(Capabilities::INVOKABLE));
        if !invokable || self.is_disabled(node) {
            return false;
        }
        self.activations.insert(node)
    }

    /// Consume a pending activation of `node`.
    pub fn take_activation(&mut self, node: NodeId) -> bool {
        self.activations.remove(&node)
    }

    // -- Accessors ----------------------------------------------------------

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.tree.get_mut(id)
    }

    /// The root node, created by the first pass.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// The node currently open for declarations.
    pub fn current(&self) -> Option<NodeId> {
        self.frames.last().map(|f| f.node)
    }

    /// Open `begin` calls, not counting the pass's root frame.
    pub fn depth(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// Number of the current (or last) pass, starting at 1.
    pub fn pass(&self) -> u64 {
        self.pass
    }

    pub fn is_pass_open(&self) -> bool {
        self.pass_open
    }

    /// Counters of the current (or last) pass.
    pub fn stats(&self) -> PassStats {
        self.stats
    }

    pub fn lifecycle(&self) -> &LifecycleTracker {
        &self.lifecycle
    }

    pub fn drain_lifecycle_events(&mut self) -> Vec<LifecycleEvent> {
        self.lifecycle.drain_events()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.config.viewport = viewport;
    }

    /// Append session-wide rules. They apply from the next cascade.
    pub fn add_sheet(&mut self, sheet: StyleSheet) {
        self.config.sheet.append(sheet);
        self.sheet_style = self.config.sheet.to_style();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
