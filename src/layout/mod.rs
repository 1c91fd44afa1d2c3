//! Layout boundary: style -> taffy mapping and the taffy tree wrapper.

pub mod engine;
pub mod resolve;

pub use engine::LayoutEngine;
pub use resolve::{resolve_style, Viewport};
