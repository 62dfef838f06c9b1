//! Key-value storage.
//!
//! - [`KeyValueStore`] - The injected `get`/`set`/`remove` interface
//! - [`MemoryStore`] - Process-lifetime store (session flags, tests)
//! - [`FileStore`] - JSON file store that survives restarts (market cache)
//! - [`CacheStore`] - Typed JSON snapshots over a persistent store
//!
//! The market cache and the session flags live in two separate stores so that
//! clearing one never touches the other.

mod cache;
mod file;
mod memory;
mod traits;

pub use cache::CacheStore;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
