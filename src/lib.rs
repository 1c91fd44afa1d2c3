//! # weft
//!
//! A retained-tree core for declarative UI: an immediate-mode style
//! declaration API on top of a persistent node tree, with a CSS-like style
//! cascade, property transitions and flexbox layout through
//! [taffy](https://crates.io/crates/taffy).
//!
//! Callers replay their declarations every frame. The [`build::Session`]
//! reconciles them against the previous frame by position and key, so
//! unchanged nodes keep their identity, state and animations.
//!
//! ## Core Systems
//!
//! - **[`build`]**: reconciler session, pass bookkeeping, scoped responses
//! - **[`tree`]**: slotmap-backed node arena, node kinds and capabilities
//! - **[`style`]**: property model, selectors, style sheets and their parser
//! - **[`cascade`]**: per-frame style resolution, state propagation, transitions
//! - **[`layout`]**: mapping resolved styles onto the taffy layout tree
//! - **[`id`]**: stable keys from call sites, values and labels
//! - **[`widgets`]**: reference widgets built on the session API
//!
//! ## Example
//!
//! ```
//! use std::time::Instant;
//!
//! use weft::build::{Session, SessionConfig};
//! use weft::geometry::Size;
//! use weft::id::Id;
//! use weft::widgets::{button, container, label};
//!
//! let config = SessionConfig::new()
//!     .with_css(".toolbar { gap: 4px; padding: 8px; }")
//!     .unwrap();
//! let mut session = Session::new(config);
//!
//! session.begin_pass();
//! {
//!     let mut bar = container(&mut session, Id::from_str("toolbar"))
//!         .class(weft::style::StyleClass::new("toolbar"))
//!         .scoped();
//!     label(&mut bar, "Ready##status");
//!     if button(&mut bar, "Save").into_value() {
//!         // handle the click
//!     }
//! }
//! session.end_pass();
//!
//! session.compute_styles(Instant::now());
//! session.compute_layout(Size::new(640.0, 480.0)).unwrap();
//! ```

// Foundation
pub mod error;
pub mod geometry;
pub mod id;

// Styles
pub mod style;

// Tree and reconciliation
pub mod build;
pub mod tree;

// Cascade and layout
pub mod cascade;
pub mod layout;

// Client widgets
pub mod widgets;

pub use build::{Response, ScopeGuard, Session, SessionConfig};
pub use error::{BuildError, ParseError};
pub use id::Id;
