//! Button: an invokable, focusable node with a label child.

use crate::build::{Response, Session};
use crate::id::Id;
use crate::style::property::Transition;
use crate::style::selector::{Selector, StyleClass};
use crate::style::style::Style;
use crate::style::value::{Align, Color, Justify, Length};
use crate::tree::{Capabilities, ChildLimit, NodeKind};

use super::label::{Text, LABEL};

/// Buttons look hovered or pressed while any part of them is, so both
/// states propagate to the label inside.
pub static BUTTON: NodeKind = NodeKind::new("Button", ChildLimit::Many)
    .with_capabilities(
        Capabilities::INVOKABLE
            .union(Capabilities::FOCUSABLE)
            .union(Capabilities::PROPAGATE_HOVER)
            .union(Capabilities::PROPAGATE_ACTIVE),
    )
    .with_builtin(button_style);

const FILL: Color = Color::rgb(0.85, 0.85, 0.85);
const FILL_HOVER: Color = Color::rgb(0.75, 0.75, 0.75);
const FILL_ACTIVE: Color = Color::rgb(0.6, 0.6, 0.6);

fn button_style() -> Style {
    let fade = Transition::millis(120);
    let fill = |color: Color| {
        Style::new().with(|s| {
            s.background.set(color).transition(fade);
        })
    };
    Style::new()
        .with(|s| {
            s.background.set(FILL).transition(fade);
            s.padding.set(Length::Px(6.0));
            s.corner_radius.set(4.0);
            s.justify_content.set(Justify::Center);
            s.align_items.set(Align::Center);
        })
        .rule(Selector::class(StyleClass::HOVER), fill(FILL_HOVER))
        .rule(Selector::class(StyleClass::ACTIVE), fill(FILL_ACTIVE))
        .rule(
            Selector::class(StyleClass::DISABLED),
            Style::new().with(|s| {
                s.opacity.set(0.5);
            }),
        )
}

/// Declare a button with a text label. The payload is `true` on the pass
/// after [`Session::activate`] was called for it.
///
/// The label follows the `display##key` convention of
/// [`label`](super::label()).
pub fn button<'s>(session: &'s mut Session, text: &str) -> Response<'s, bool> {
    let (key, display) = Id::from_label::<Text>(text);
    let node = session.begin(&BUTTON, key);
    let activated = session.take_activation(node);
    let inner = session.begin(&LABEL, None);
    if let Some(n) = session.node_mut(inner) {
        n.set_context(Text(display.to_string()));
    }
    session.end(&LABEL);
    session.end(&BUTTON);
    Response::closed(session, &BUTTON, node, activated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_is_reported_once() {
        let mut session = Session::default();
        session.begin_pass();
        let response = button(&mut session, "OK");
        assert!(!response.value());
        let id = response.node().unwrap();
        session.end_pass();

        assert!(session.activate(id));

        session.begin_pass();
        assert!(button(&mut session, "OK").into_value());
        session.end_pass();

        session.begin_pass();
        assert!(!button(&mut session, "OK").into_value());
        session.end_pass();
    }

    #[test]
    fn unconsumed_activation_expires_with_the_pass() {
        let mut session = Session::default();
        session.begin_pass();
        let id = button(&mut session, "OK").node().unwrap();
        session.end_pass();

        session.activate(id);
        session.begin_pass();
        session.end_pass();

        session.begin_pass();
        let again = button(&mut session, "OK");
        assert!(!again.value());
        session.end_pass();
    }

    #[test]
    fn label_child_carries_text() {
        let mut session = Session::default();
        session.begin_pass();
        let id = button(&mut session, "Apply##apply").node().unwrap();
        session.end_pass();
        let label = session.tree().children(id)[0];
        let text = session.node(label).and_then(|n| n.context::<Text>());
        assert_eq!(text, Some(&Text("Apply".into())));
    }

    #[test]
    fn capabilities() {
        assert!(BUTTON.has(Capabilities::INVOKABLE | Capabilities::PROPAGATE_HOVER));
        assert!(!BUTTON.has(Capabilities::TOGGLEABLE));
    }
}
