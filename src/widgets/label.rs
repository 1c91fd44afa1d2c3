//! Text leaves: Label, and the Caption and Tooltip siblings that
//! [`Response::caption`](crate::build::Response::caption) and
//! [`Response::tooltip`](crate::build::Response::tooltip) declare.

use crate::build::{Response, Session};
use crate::id::Id;
use crate::style::style::Style;
use crate::style::value::Color;
use crate::tree::{ChildLimit, NodeKind};

/// Text content of a leaf node, stored in its context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text(pub String);

pub static LABEL: NodeKind = NodeKind::new("Label", ChildLimit::Leaf);

pub static CAPTION: NodeKind = NodeKind::new("Caption", ChildLimit::Leaf).with_builtin(caption_style);

pub static TOOLTIP: NodeKind = NodeKind::new("Tooltip", ChildLimit::Leaf).with_builtin(tooltip_style);

fn caption_style() -> Style {
    Style::new().with(|s| {
        s.color.set(Color::GRAY);
        s.font_size.set(12.0);
    })
}

fn tooltip_style() -> Style {
    Style::new().with(|s| {
        s.background.set(Color::rgba(0.1, 0.1, 0.1, 0.9));
        s.color.set(Color::WHITE);
        s.corner_radius.set(3.0);
    })
}

/// Declare a label.
///
/// `text` follows the `display##key` convention: the part before the first
/// `##` is shown, and the part from the last `##` on is the node's key, so
/// the shown text can change without losing the node.
pub fn label<'s>(session: &'s mut Session, text: &str) -> Response<'s> {
    let (key, display) = Id::from_label::<Text>(text);
    let node = session.begin(&LABEL, key);
    if let Some(n) = session.node_mut(node) {
        n.set_context(Text(display.to_string()));
    }
    session.end(&LABEL);
    Response::closed(session, &LABEL, node, ())
}
