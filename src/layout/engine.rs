//! TaffyTree wrapper for layout computation.
//!
//! [`LayoutEngine`] keeps one taffy node per retained node, mirrors child
//! lists, runs layout and hands results back as [`Rect`]s.

use std::collections::HashMap;

use taffy::prelude::*;
use tracing::warn;

use crate::geometry::{Rect, Size};
use crate::tree::NodeId;

/// Maps retained [`NodeId`]s to taffy nodes.
pub struct LayoutEngine {
    /// The taffy tree, parameterized with our NodeId as context data.
    tree: TaffyTree<NodeId>,
    /// Maps NodeId -> taffy NodeId for quick lookup.
    node_map: HashMap<NodeId, taffy::prelude::NodeId>,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
            node_map: HashMap::new(),
        }
    }

    /// Create the taffy node for `node` with a default style.
    pub fn create(&mut self, node: NodeId) -> Result<taffy::prelude::NodeId, taffy::TaffyError> {
        let handle = self
            .tree
            .new_leaf_with_context(taffy::Style::default(), node)?;
        self.node_map.insert(node, handle);
        Ok(handle)
    }

    /// Drop the taffy node for `node`. Unknown nodes are ignored.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(handle) = self.node_map.remove(&node) {
            if let Err(err) = self.tree.remove(handle) {
                warn!(?node, %err, "failed to remove layout node");
            }
        }
    }

    /// The taffy node for `node`.
    pub fn handle(&self, node: NodeId) -> Option<taffy::prelude::NodeId> {
        self.node_map.get(&node).copied()
    }

    /// Replace the solver children of `node`.
    pub fn set_children(&mut self, node: NodeId, children: &[NodeId]) -> Result<(), taffy::TaffyError> {
        let Some(&handle) = self.node_map.get(&node) else {
            return Ok(());
        };
        let handles: Vec<taffy::prelude::NodeId> = children
            .iter()
            .filter_map(|child| self.node_map.get(child).copied())
            .collect();
        self.tree.set_children(handle, &handles)
    }

    /// Replace the solver style of `node`.
    pub fn set_style(&mut self, node: NodeId, style: taffy::Style) -> Result<(), taffy::TaffyError> {
        match self.node_map.get(&node) {
            Some(&handle) => self.tree.set_style(handle, style),
            None => Ok(()),
        }
    }

    /// The solver style currently stored for `node`.
    pub fn style(&self, node: NodeId) -> Option<&taffy::Style> {
        let handle = self.node_map.get(&node)?;
        self.tree.style(*handle).ok()
    }

    /// Run layout from `root` within `available` space.
    pub fn compute(&mut self, root: NodeId, available: Size) -> Result<(), taffy::TaffyError> {
        let Some(&handle) = self.node_map.get(&root) else {
            return Ok(());
        };
        self.tree.compute_layout(
            handle,
            taffy::geometry::Size {
                width: AvailableSpace::Definite(available.width),
                height: AvailableSpace::Definite(available.height),
            },
        )
    }

    /// The last computed box of `node`, relative to its parent.
    pub fn layout(&self, node: NodeId) -> Option<Rect> {
        let handle = self.node_map.get(&node)?;
        self.tree.layout(*handle).ok().map(Rect::from)
    }

    /// Number of taffy nodes.
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}
