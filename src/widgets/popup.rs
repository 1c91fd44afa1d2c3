//! Popup: a conditionally declared overlay.

use crate::build::{Response, Session};
use crate::id::Id;
use crate::style::style::Style;
use crate::style::value::{Color, Position};
use crate::tree::{ChildLimit, NodeKind};

pub static POPUP: NodeKind = NodeKind::new("Popup", ChildLimit::Many).with_builtin(popup_style);

fn popup_style() -> Style {
    Style::new().with(|s| {
        s.position.set(Position::Absolute);
        s.background.set(Color::WHITE);
        s.border_color.set(Color::GRAY);
        s.corner_radius.set(4.0);
    })
}

/// Declare a popup when `open` is true.
///
/// ```
/// use weft::build::Session;
/// use weft::id::Id;
/// use weft::widgets::{label, popup};
///
/// let mut session = Session::default();
/// for open in [true, false] {
///     session.begin_pass();
///     let menu = popup(&mut session, Id::from_str("menu"), open);
///     if *menu.value() {
///         let mut menu = menu.scoped();
///         label(&mut menu, "Cut");
///     }
///     session.end_pass();
/// }
/// assert_eq!(session.stats().destroyed, 2);
/// ```
pub fn popup(session: &mut Session, key: impl Into<Option<Id>>, open: bool) -> Response<'_, bool> {
    session.begin_if(&POPUP, key, open)
}
