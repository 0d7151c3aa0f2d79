//! Session-stored visitor state.

pub mod session;

pub use session::{VisitorSession, keys as session_keys};
