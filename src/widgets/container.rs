//! Layout containers: Container (any number of children) and Panel (one).

use crate::build::{Response, Session};
use crate::id::Id;
use crate::style::style::Style;
use crate::style::value::{Display, FlexDirection, Length};
use crate::tree::{ChildLimit, NodeKind};

/// A column of children.
pub static CONTAINER: NodeKind = NodeKind::new("Container", ChildLimit::Many).with_builtin(container_style);

/// A padded frame around exactly one child.
pub static PANEL: NodeKind = NodeKind::new("Panel", ChildLimit::Single).with_builtin(panel_style);

fn container_style() -> Style {
    Style::new().with(|s| {
        s.display.set(Display::Flex);
        s.flex_direction.set(FlexDirection::Column);
    })
}

fn panel_style() -> Style {
    Style::new().with(|s| {
        s.display.set(Display::Flex);
        s.padding.set(Length::Px(8.0));
        s.corner_radius.set(4.0);
    })
}

/// Open a container. Declare children, then end it (or use
/// [`Response::scoped`]).
pub fn container(session: &mut Session, key: impl Into<Option<Id>>) -> Response<'_> {
    session.declare(&CONTAINER, key)
}

/// Open a panel. A second child is a protocol error.
pub fn panel(session: &mut Session, key: impl Into<Option<Id>>) -> Response<'_> {
    session.declare(&PANEL, key)
}
