//! Document registry module.
//!
//! - `model`: `DocumentRecord` and the append-only `DocumentRegistry`
//! - `store`: `KeyValueStore` trait for the persistent mirror
//! - `mirror`: `RegistryMirror`, the write-through JSON mirror

mod mirror;
mod model;
mod store;

pub use mirror::{REGISTRY_KEY, RegistryMirror};
pub use model::{DocumentRecord, DocumentRegistry};
pub use store::KeyValueStore;
