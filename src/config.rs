//! Configuration Module
//!
//! Loads storage configuration from environment variables.

use std::env;

/// Default byte quota of the in-memory medium (5 MiB).
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Storage configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Initial namespace applied to every key, None = keys used as-is
    pub namespace: Option<String>,
    /// Maximum bytes (keys plus values) the in-memory medium accepts
    pub quota_bytes: usize,
}

impl StorageConfig {
    /// Creates a new StorageConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TYPED_STORAGE_NAMESPACE` - Initial namespace (default: none, empty = none)
    /// - `TYPED_STORAGE_QUOTA_BYTES` - In-memory quota in bytes (default: 5 MiB)
    pub fn from_env() -> Self {
        Self {
            namespace: env::var("TYPED_STORAGE_NAMESPACE")
                .ok()
                .filter(|ns| !ns.is_empty()),
            quota_bytes: env::var("TYPED_STORAGE_QUOTA_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_QUOTA_BYTES),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        }
    }
}
