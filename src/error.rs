//! Error types.
//!
//! [`BuildError`] covers misuse of the begin/end protocol. The panicking
//! session methods raise it as a panic message; the `try_` methods return it.
//! Style sheet failures are [`ParseError`]s.

pub use crate::style::parser::ParseError;

/// A violation of the declaration protocol.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error("end({kind}) called with no open begin")]
    EndWithoutBegin { kind: &'static str },
    #[error("end({found}) does not match the open begin({expected})")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("pass ended with {open} unclosed begin call(s)")]
    Unbalanced { open: usize },
    #[error("{parent} accepts a single child but a second one was declared")]
    TooManyChildren { parent: &'static str },
    #[error("{parent} cannot have children")]
    ChildOfLeaf { parent: &'static str },
    #[error("no pass is open; call begin_pass first")]
    NoPass,
    #[error("a pass is already open")]
    PassAlreadyOpen,
    #[error("layout solver error: {0}")]
    Layout(String),
}

impl From<taffy::TaffyError> for BuildError {
    fn from(err: taffy::TaffyError) -> Self {
        BuildError::Layout(err.to_string())
    }
}
