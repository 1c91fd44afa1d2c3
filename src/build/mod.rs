//! Declaration passes: the reconciling [`Session`], its configuration, and
//! the [`Response`] builders widget helpers return.

pub mod config;
mod frame;
pub mod response;
pub mod session;

pub use config::SessionConfig;
pub use response::{Response, ScopeGuard};
pub use session::{PassStats, Session};
