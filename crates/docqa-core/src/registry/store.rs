//! Key-value store trait.
//!
//! Defines the small persistent store the client mirrors its registry into.

use crate::error::Result;

/// A string-keyed, string-valued persistent store.
///
/// Modeled on a browser's local storage: synchronous, whole-value writes,
/// last writer wins. Implementations live in `docqa-infrastructure`.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Key present
    /// - `Ok(None)`: Key absent
    /// - `Err(_)`: The backing storage could not be read
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
