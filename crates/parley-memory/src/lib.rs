//! # parley-memory
//!
//! In-process conversation memory for Parley. Nothing is persisted;
//! sessions vanish with the process.

pub mod profile;
pub mod store;

pub use profile::Profile;
pub use store::{Session, SessionHandle, SessionStore};
