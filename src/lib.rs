//! Typed Storage - typed accessors over string key-value storage
//!
//! Stores structured values under string keys with optional namespacing and
//! time-to-live expiry, and reads them back through a schema with a safe
//! fallback.
//!
//! # Example
//! ```
//! use typed_storage::{typed, MemoryStorage, TypedStorage};
//!
//! let mut storage = TypedStorage::new(MemoryStorage::new());
//! storage.write("count", &42).unwrap();
//! assert_eq!(storage.read("count", 0, &typed::<i64>()).unwrap(), 42);
//!
//! storage.write("count", "oops").unwrap();
//! assert_eq!(storage.read("count", 0, &typed::<i64>()).unwrap(), 0);
//!
//! storage.set_namespace("app");
//! storage.write("count", &7).unwrap();
//! assert!(storage.exists("count").unwrap());
//! assert_eq!(storage.physical_key("count"), "app:count");
//! ```

pub mod config;
pub mod error;
pub mod storage;
pub mod tasks;

pub use config::StorageConfig;
pub use error::{Result, StorageError};
pub use storage::{
    one_of, typed, MemoryStorage, Schema, SchemaExt, StorageMedium, Typed, TypedStorage,
    Validation,
};
pub use tasks::{ExpiryHandle, ExpiryScheduler, ManualScheduler, TokioScheduler};
