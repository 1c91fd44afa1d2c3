//! The retained tree: a slotmap arena with parent/child links and a mirrored
//! layout tree.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use crate::geometry::{Rect, Size};
use crate::id::Id;
use crate::layout::LayoutEngine;
use crate::style::selector::{SelectorSubject, StyleClass};

use super::kind::NodeKind;
use super::node::{Node, NodeId};

const EMPTY_CHILDREN: &[NodeId] = &[];

/// The retained node tree.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that removal is O(subtree size) and lookup is O(1).
/// Every node owns one layout node in the embedded [`LayoutEngine`].
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
    layout: LayoutEngine,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
            layout: LayoutEngine::new(),
        }
    }

    /// Create a detached node with its layout node.
    ///
    /// The first node created becomes the root. `parent` is recorded as the
    /// node's parent link; the parent's child list is only changed by
    /// [`Tree::set_children`].
    pub fn insert(
        &mut self,
        kind: &'static NodeKind,
        key: Option<Id>,
        parent: Option<NodeId>,
        pass: u64,
    ) -> Result<NodeId, taffy::TaffyError> {
        let id = self.nodes.insert(Node::new(kind, key, pass));
        if let Err(err) = self.layout.create(id) {
            self.nodes.remove(id);
            return Err(err);
        }
        self.children.insert(id, Vec::new());
        if let Some(parent) = parent {
            debug_assert!(self.nodes.contains_key(parent), "parent node does not exist");
            self.parent.insert(id, parent);
        }
        if self.root.is_none() {
            self.root = Some(id);
        }
        Ok(id)
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the removed ids, `id` first, in breadth-first order. Context
    /// objects are dropped with their nodes.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }

        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }

        let mut removed = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            self.layout.remove(current);
            if self.nodes.remove(current).is_some() {
                removed.push(current);
            }
        }
        removed
    }

    /// Replace the child list of `id`. Returns `false` when the list was
    /// already equal and nothing changed.
    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) -> Result<bool, taffy::TaffyError> {
        if self.children(id) == children.as_slice() {
            return Ok(false);
        }
        for &child in &children {
            self.parent.insert(child, id);
        }
        self.layout.set_children(id, &children)?;
        self.children.insert(id, children);
        Ok(true)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Children of a node. Empty for unknown nodes.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Ancestors of `id`, nearest first. Does not include `id`.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Pre-order depth-first traversal from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        result
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    // -- Layout -------------------------------------------------------------

    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.layout
    }

    pub(crate) fn layout_engine_mut(&mut self) -> &mut LayoutEngine {
        &mut self.layout
    }

    /// The layout solver handle owned by `id`.
    pub fn layout_handle(&self, id: NodeId) -> Option<taffy::NodeId> {
        self.layout.handle(id)
    }

    /// Run layout from the root.
    pub fn compute_layout(&mut self, available: Size) -> Result<(), taffy::TaffyError> {
        match self.root {
            Some(root) => self.layout.compute(root, available),
            None => Ok(()),
        }
    }

    /// The last computed box of `id`, relative to its parent.
    pub fn layout(&self, id: NodeId) -> Option<Rect> {
        self.layout.layout(id)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorSubject for Tree {
    fn has_class(&self, node: NodeId, class: StyleClass) -> bool {
        self.nodes.get(node).is_some_and(|n| {
            n.has_class(class) || (class.is_pseudo() && n.state.has_pseudo(class))
        })
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Tree::parent(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::kind::ChildLimit;
    use crate::tree::node::NodeState;
    use taffy::prelude::FromLength;

    static BOX: NodeKind = NodeKind::new("Box", ChildLimit::Many);

    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (Tree, [NodeId; 5]) {
        let mut tree = Tree::new();
        let root = tree.insert(&BOX, None, None, 0).unwrap();
        let a = tree.insert(&BOX, Some(Id::from_str("a")), Some(root), 0).unwrap();
        let b = tree.insert(&BOX, Some(Id::from_str("b")), Some(root), 0).unwrap();
        let c = tree.insert(&BOX, Some(Id::from_str("c")), Some(a), 0).unwrap();
        let d = tree.insert(&BOX, Some(Id::from_str("d")), Some(a), 0).unwrap();
        tree.set_children(root, vec![a, b]).unwrap();
        tree.set_children(a, vec![c, d]).unwrap();
        (tree, [root, a, b, c, d])
    }

    #[test]
    fn first_insert_is_root() {
        let (tree, [root, ..]) = build_tree();
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.layout_engine().len(), 5);
    }

    #[test]
    fn walk_is_preorder() {
        let (tree, [root, a, b, c, d]) = build_tree();
        assert_eq!(tree.walk_depth_first(root), vec![root, a, c, d, b]);
    }

    #[test]
    fn ancestors_nearest_first() {
        let (tree, [root, a, _, c, _]) = build_tree();
        assert_eq!(tree.ancestors(c), vec![a, root]);
        assert!(tree.ancestors(root).is_empty());
    }

    #[test]
    fn remove_takes_subtree_and_layout_nodes() {
        let (mut tree, [root, a, b, c, d]) = build_tree();
        let removed = tree.remove(a);
        assert_eq!(removed, vec![a, c, d]);
        assert_eq!(tree.children(root), &[b]);
        assert!(!tree.contains(c));
        assert!(tree.layout_handle(d).is_none());
        assert_eq!(tree.layout_engine().len(), 2);
        assert!(tree.remove(a).is_empty());
    }

    #[test]
    fn set_children_reports_change() {
        let (mut tree, [root, a, b, ..]) = build_tree();
        assert!(!tree.set_children(root, vec![a, b]).unwrap());
        assert!(tree.set_children(root, vec![b, a]).unwrap());
        assert_eq!(tree.children(root), &[b, a]);
    }

    #[test]
    fn selector_subject_sees_state_and_kind() {
        let (mut tree, [_, a, b, ..]) = build_tree();
        if let Some(node) = tree.get_mut(a) {
            node.state.insert(NodeState::HOVER);
        }
        assert!(tree.has_class(a, StyleClass::HOVER));
        assert!(!tree.has_class(b, StyleClass::HOVER));
        assert!(tree.has_class(b, BOX.class));
    }

    #[test]
    fn layout_follows_children() {
        let (mut tree, [root, a, b, ..]) = build_tree();
        let sized = |w: f32, h: f32| taffy::Style {
            size: taffy::geometry::Size {
                width: taffy::style::Dimension::from_length(w),
                height: taffy::style::Dimension::from_length(h),
            },
            flex_direction: taffy::style::FlexDirection::Column,
            ..Default::default()
        };
        let engine = tree.layout_engine_mut();
        engine.set_style(root, sized(100.0, 100.0)).unwrap();
        engine.set_style(a, sized(100.0, 30.0)).unwrap();
        engine.set_style(b, sized(100.0, 20.0)).unwrap();
        tree.compute_layout(Size::new(100.0, 100.0)).unwrap();
        assert_eq!(tree.layout(b), Some(Rect::new(0.0, 30.0, 100.0, 20.0)));
    }
}
