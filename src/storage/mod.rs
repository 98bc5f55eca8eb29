//! Storage Module
//!
//! Typed, namespaced access to a string key-value medium.
//!
//! # Persisted layout
//! Physical keys are `"{namespace}:{key}"` (or `key` with no namespace).
//! Strings, numbers and booleans are stored as plain text; objects, arrays
//! and null as compact JSON.

mod codec;
mod medium;
mod namespace;
mod schema;
mod typed;


// Re-export public types
pub use codec::{decode_candidate, encode, try_parse_structured};
pub use medium::{MemoryStorage, StorageMedium};
pub use namespace::{logical_key, physical_key, NAMESPACE_SEPARATOR};
pub use schema::{one_of, typed, Mapped, Refined, Schema, SchemaExt, Typed, Validation};
pub use typed::TypedStorage;
