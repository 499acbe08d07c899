//! In-memory backend for the incident store.
//!
//! Records live for the lifetime of the process. Readers share an immutable
//! snapshot; writers swap in a new one, so an append is never observed
//! half-done.

mod store;

pub mod error;
pub mod seed;

pub use error::{Error, Result};
pub use store::MemoryStore;
