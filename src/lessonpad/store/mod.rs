//! # Storage Layer
//!
//! The [`KeyValueStore`] trait is the only thing lessonpad knows about
//! persistence: a flat namespace of string keys holding string values. The
//! repository layers lesson semantics (prefix scanning, JSON records, ids) on
//! top of it.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage
//!   - All pairs live in one JSON object, `storage.json`, in the data directory
//!   - Writes go to a temporary file that is renamed over the original
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!   - No persistence
//!   - Can simulate write failures
//!
//! ## Key Order
//!
//! Both implementations enumerate keys in lexicographic order. Callers must
//! not read anything into that order beyond it being stable.

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Abstract interface for a string key/value store.
pub trait KeyValueStore {
    /// All keys currently present.
    fn keys(&self) -> Result<Vec<String>>;

    /// The value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}
