//! Reference widgets: Container, Panel, Label, Button, Popup, and the
//! Caption and Tooltip siblings.

pub mod button;
pub mod container;
pub mod label;
pub mod popup;

pub use button::{button, BUTTON};
pub use container::{container, panel, CONTAINER, PANEL};
pub use label::{label, Text, CAPTION, LABEL, TOOLTIP};
pub use popup::{popup, POPUP};
