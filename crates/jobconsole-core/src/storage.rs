//! Storage capability consumed by the console writer.
//!
//! The writer only needs two operations from its backing store: add a scored
//! member to an ordered set, and set fields in a hash. Readers additionally
//! need to range over the set and fetch hash fields. Both sides are traits so
//! the writer can be handed any backend by construction:
//!
//! - [`MemoryStorage`]: in-process maps, used by tests and embedders
//! - [`RedbStorage`]: a single redb file, used by the CLI

use crate::error::ConsoleResult;

mod disk;
mod memory;

pub use disk::RedbStorage;
pub use memory::MemoryStorage;

/// Write side of the store.
pub trait ConsoleStorage: Send + Sync {
    /// Add `value` to the ordered set at `key` with the given score.
    fn add_to_set(&self, key: &str, value: &str, score: f64) -> ConsoleResult<()>;

    /// Set one or more fields of the hash at `key`.
    fn set_range_in_hash(&self, key: &str, fields: &[(String, String)]) -> ConsoleResult<()>;
}

/// Read side of the store.
pub trait ConsoleSource: Send + Sync {
    /// All members of the ordered set at `key`, ascending by score.
    fn range_from_set(&self, key: &str) -> ConsoleResult<Vec<(String, f64)>>;

    /// A single hash field, or `None` if it is not set.
    fn get_value_from_hash(&self, key: &str, field: &str) -> ConsoleResult<Option<String>>;
}
