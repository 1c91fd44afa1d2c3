//! Scoped result builders.
//!
//! Widget helpers return a [`Response`]: a handle on the node they declared
//! plus a payload (for example whether a button was activated this pass).
//! Setters forward to the node and chain. A response whose `end` is still
//! owed can become a [`ScopeGuard`], which declares children through
//! `Deref<Target = Session>` and calls `end` when dropped.

use std::any::Any;
use std::ops::{Deref, DerefMut};

use crate::geometry::Rect;
use crate::style::selector::StyleClass;
use crate::style::style::Style;
use crate::tree::{Node, NodeId, NodeKind, NodeState};
use crate::widgets::{CAPTION, TOOLTIP};

use super::session::Session;

/// The result of declaring a node.
pub struct Response<'s, T = ()> {
    session: &'s mut Session,
    kind: &'static NodeKind,
    /// `None` when a conditional declaration was skipped.
    node: Option<NodeId>,
    owes_end: bool,
    value: T,
}

impl<'s, T> Response<'s, T> {
    /// A response for a node that is still open.
    pub fn open(session: &'s mut Session, kind: &'static NodeKind, node: NodeId, value: T) -> Self {
        Self {
            session,
            kind,
            node: Some(node),
            owes_end: true,
            value,
        }
    }

    /// A response for a node whose `end` has already been called.
    pub fn closed(session: &'s mut Session, kind: &'static NodeKind, node: NodeId, value: T) -> Self {
        Self {
            session,
            kind,
            node: Some(node),
            owes_end: false,
            value,
        }
    }

    /// A response for a declaration that did not happen.
    pub fn hidden(session: &'s mut Session, kind: &'static NodeKind, value: T) -> Self {
        Self {
            session,
            kind,
            node: None,
            owes_end: false,
            value,
        }
    }

    fn update(mut self, f: impl FnOnce(&mut Node)) -> Self {
        if let Some(node) = self.node.and_then(|id| self.session.node_mut(id)) {
            f(node);
        }
        self
    }

    /// Replace the node's explicit style for this pass.
    pub fn style(self, style: Style) -> Self {
        self.update(|node| node.style = style)
    }

    /// Merge `style` over the node's explicit style.
    pub fn add_style(self, style: &Style) -> Self {
        self.update(|node| node.style += style)
    }

    pub fn class(self, class: StyleClass) -> Self {
        self.update(|node| node.add_class(class))
    }

    pub fn disabled(self, disabled: bool) -> Self {
        self.update(|node| node.state.set(NodeState::DISABLED, disabled))
    }

    /// Declare a caption sibling right after the node.
    pub fn caption(self, text: impl Into<String>) -> Self {
        self.attach(&CAPTION, text.into())
    }

    /// Declare a tooltip sibling right after the node.
    pub fn tooltip(self, text: impl Into<String>) -> Self {
        self.attach(&TOOLTIP, text.into())
    }

    fn attach(mut self, kind: &'static NodeKind, text: String) -> Self {
        if let Some(owner) = self.node {
            if let Err(err) = self.session.attach(owner, kind, text) {
                panic!("{err}");
            }
        }
        self
    }

    /// Store a typed value in the node's context.
    pub fn with_context<C: Any>(self, value: C) -> Self {
        self.update(|node| node.set_context(value))
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the payload. If the `end` is still owed, the caller pairs it.
    pub fn into_value(self) -> T {
        self.value
    }

    /// The node's handle in the layout solver.
    pub fn layout_handle(&self) -> Option<taffy::NodeId> {
        self.node.and_then(|id| self.session.tree().layout_handle(id))
    }

    /// The node's box from the last layout run.
    pub fn layout(&self) -> Option<Rect> {
        self.node.and_then(|id| self.session.layout(id))
    }

    /// Whether this response still owes the matching `end`.
    pub fn is_open(&self) -> bool {
        self.owes_end
    }

    /// Turn the response into a guard that calls `end` when dropped.
    ///
    /// ```
    /// use weft::build::Session;
    /// use weft::id::Id;
    /// use weft::widgets::{self, CONTAINER};
    ///
    /// let mut session = Session::default();
    /// session.begin_pass();
    /// {
    ///     let mut list = session.declare(&CONTAINER, Id::from_str("list")).scoped();
    ///     widgets::label(&mut list, "first");
    ///     widgets::label(&mut list, "second");
    /// }
    /// session.end_pass();
    /// ```
    pub fn scoped(self) -> ScopeGuard<'s> {
        ScopeGuard {
            session: self.session,
            kind: self.kind,
            node: self.node,
            owes_end: self.owes_end,
        }
    }
}

/// Calls `end` for its node exactly once when dropped, unless released.
pub struct ScopeGuard<'s> {
    session: &'s mut Session,
    kind: &'static NodeKind,
    node: Option<NodeId>,
    owes_end: bool,
}

impl ScopeGuard<'_> {
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Stop the guard from calling `end`; the caller pairs it instead.
    pub fn release(&mut self) {
        self.owes_end = false;
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = Session;

    fn deref(&self) -> &Session {
        self.session
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Session {
        self.session
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if !std::mem::take(&mut self.owes_end) {
            return;
        }
        if let Err(err) = self.session.try_end(self.kind) {
            // Never panic while already unwinding.
            if !std::thread::panicking() {
                panic!("{err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Id;
    use crate::style::value::Color;
    use crate::widgets::{Text, CONTAINER, LABEL, POPUP};

    fn text_of(session: &Session, id: NodeId) -> Option<&str> {
        session.node(id)?.context::<Text>().map(|t| t.0.as_str())
    }

    #[test]
    fn guard_ends_once() {
        let mut session = Session::default();
        session.begin_pass();
        {
            let mut guard = session.declare(&CONTAINER, Id::from_str("a")).scoped();
            assert_eq!(guard.depth(), 1);
            guard.begin(&LABEL, None);
            guard.end(&LABEL);
        }
        assert_eq!(session.depth(), 0);
        session.end_pass();
    }

    #[test]
    fn released_guard_leaves_end_to_caller() {
        let mut session = Session::default();
        session.begin_pass();
        {
            let mut guard = session.declare(&CONTAINER, None).scoped();
            guard.release();
        }
        assert_eq!(session.depth(), 1);
        session.end(&CONTAINER);
        session.end_pass();
    }

    #[test]
    fn hidden_conditional_never_ends() {
        let mut session = Session::default();
        session.begin_pass();
        let outer = session.begin(&CONTAINER, None);
        {
            let popup = session.begin_if(&POPUP, Id::from_str("menu"), false);
            assert!(!*popup.value());
            assert!(popup.node().is_none());
            let _guard = popup.scoped();
        }
        assert_eq!(session.current(), Some(outer));
        session.end(&CONTAINER);
        session.end_pass();
        assert!(session.tree().children(outer).is_empty());
    }

    #[test]
    fn setters_forward_to_node() {
        let mut session = Session::default();
        session.begin_pass();
        let response = session
            .declare(&CONTAINER, None)
            .style(Style::new().with(|s| {
                s.color.set(Color::RED);
            }))
            .add_style(&Style::new().with(|s| {
                s.opacity.set(0.5);
            }))
            .class(StyleClass::new("wide"))
            .disabled(true)
            .with_context(7u32);
        let id = response.node().unwrap();
        drop(response.scoped());

        let node = session.node(id).unwrap();
        assert_eq!(node.style.color.get(), Some(&Color::RED));
        assert_eq!(node.style.opacity.get(), Some(&0.5));
        assert!(node.has_class(StyleClass::new("wide")));
        assert!(node.is_disabled());
        assert_eq!(node.context::<u32>(), Some(&7));
        session.end_pass();
    }

    #[test]
    fn caption_waits_for_open_node() {
        let mut session = Session::default();
        session.begin_pass();
        let panel = session
            .declare(&CONTAINER, Id::from_str("settings"))
            .caption("Settings")
            .tooltip("All the knobs");
        let id = panel.node().unwrap();
        {
            let mut guard = panel.scoped();
            guard.begin(&LABEL, None);
            guard.end(&LABEL);
        }
        session.end_pass();

        let root = session.root().unwrap();
        let siblings = session.tree().children(root).to_vec();
        assert_eq!(siblings.len(), 3);
        assert_eq!(siblings[0], id);
        assert_eq!(session.node(siblings[1]).unwrap().kind.name, "Caption");
        assert_eq!(text_of(&session, siblings[1]), Some("Settings"));
        assert_eq!(text_of(&session, siblings[2]), Some("All the knobs"));
        assert_eq!(session.tree().children(id).len(), 1);
    }

    #[test]
    fn caption_on_closed_node_is_next_sibling() {
        let mut session = Session::default();
        session.begin_pass();
        let id = session.begin(&LABEL, Id::from_str("name"));
        session.end(&LABEL);
        let _ = Response::closed(&mut session, &LABEL, id, ()).caption("Name");
        session.end_pass();

        let root = session.root().unwrap();
        let siblings = session.tree().children(root);
        assert_eq!(siblings.len(), 2);
        assert_eq!(text_of(&session, siblings[1]), Some("Name"));
    }

    #[test]
    fn layout_handle_is_stable_across_passes() {
        let mut session = Session::default();
        let mut handles = Vec::new();
        for _ in 0..2 {
            session.begin_pass();
            let response = session.declare(&CONTAINER, Id::from_str("a"));
            handles.push(response.layout_handle());
            drop(response.scoped());
            session.end_pass();
        }
        assert!(handles[0].is_some());
        assert_eq!(handles[0], handles[1]);
    }
}
