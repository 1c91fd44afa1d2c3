//! The retained tree: node ids, node kinds, nodes, the arena and lifecycle events.

pub mod arena;
pub mod kind;
pub mod lifecycle;
pub mod node;

pub use arena::Tree;
pub use kind::{Capabilities, ChildLimit, NodeKind, ROOT};
pub use lifecycle::{LifecycleEvent, LifecycleTracker};
pub use node::{Node, NodeId, NodeState};
