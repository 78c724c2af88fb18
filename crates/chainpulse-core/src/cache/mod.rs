//! Snapshot caching over a key-value boundary.
//!
//! The cache holds exactly one value: the latest throughput snapshot,
//! serialized as a JSON array under a fixed key and replaced wholesale on
//! every refresh. Per-key read/write atomicity is delegated to the
//! [`KvStore`] implementation; this module adds no locking of its own, and
//! two concurrent writes resolve last-write-wins.
//!
//! # Error Handling Conventions
//!
//! - `Miss` — the key has never been written. Expected, not an
//!   infrastructure failure; distinct from an empty-but-valid snapshot.
//! - `Unavailable` — the key-value transport failed.
//! - `Encode` / `Decode` — serialization failures. A corrupt stored value is
//!   reported, never silently treated as empty.

pub mod kv;
pub mod snapshot;

pub use kv::{KvError, KvStore, MemoryKv};
pub use snapshot::{CacheError, MetricsCache, THROUGHPUT_KEY};
