//! The style cascade: layer merging, rule matching, state propagation and
//! transitions.

pub mod pipeline;
pub mod state;
pub mod transition;

pub use pipeline::{Cascade, Resolved};
pub use state::effective_state;
pub use transition::{animate_property, TransitionState, TransitionTable};
