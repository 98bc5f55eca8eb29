//! Storage Medium Module
//!
//! The string-keyed medium the typed layer sits on, plus an in-memory
//! implementation with an optional byte quota.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::StorageConfig;
use crate::error::{Result, StorageError};

// == Storage Medium Trait ==
/// Synchronous string key-value medium, shaped like browser page/session storage.
///
/// Every method returns a `Result` so that medium failures (quota exceeded,
/// storage disabled) surface unmodified to the caller.
pub trait StorageMedium: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any existing entry.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Removes every entry.
    fn clear(&self) -> Result<()>;

    /// Number of entries.
    fn len(&self) -> Result<usize>;

    /// Key at position `index`, or `None` past the end.
    ///
    /// Order is implementation defined but stable while the medium is unchanged.
    fn key(&self, index: usize) -> Result<Option<String>>;

    /// Returns true if the medium holds no entries.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: StorageMedium + ?Sized> StorageMedium for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        (**self).key(index)
    }
}

impl<T: StorageMedium + ?Sized> StorageMedium for Arc<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        (**self).key(index)
    }
}

// == Memory Storage ==
#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    /// Sum of key and value lengths over all entries
    used_bytes: usize,
}

/// Thread-safe in-memory medium.
///
/// Keys iterate in lexicographic order. An optional quota bounds the sum of
/// key and value byte lengths; a write that would exceed it fails with
/// [`StorageError::QuotaExceeded`] and leaves the previous entry in place.
///
/// Cloning is cheap and yields another handle onto the same entries, the way
/// every page handle on one origin sees the same storage.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    inner: Arc<RwLock<Inner>>,
    quota_bytes: Option<usize>,
    enabled: bool,
}

impl MemoryStorage {
    // == Constructors ==
    /// Creates an empty, unbounded medium.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            quota_bytes: None,
            enabled: true,
        }
    }

    /// Creates an empty medium that accepts at most `quota_bytes` bytes.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::new()
        }
    }

    /// Creates a medium sized from configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::with_quota(config.quota_bytes)
    }

    /// Creates a medium on which every operation fails with
    /// [`StorageError::Unavailable`], as storage does in some privacy modes.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Bytes currently held (keys plus values).
    pub fn used_bytes(&self) -> usize {
        self.inner.read().used_bytes
    }

    fn ensure_enabled(&self) -> Result<()> {
        if self.enabled {
            Ok(())
        } else {
            Err(StorageError::Unavailable(
                "storage is disabled in this environment".to_string(),
            ))
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageMedium for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.ensure_enabled()?;
        Ok(self.inner.read().entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_enabled()?;
        let mut inner = self.inner.write();

        let previous = inner
            .entries
            .get(key)
            .map(|old| key.len() + old.len())
            .unwrap_or(0);
        let projected = inner.used_bytes - previous + key.len() + value.len();

        if let Some(quota) = self.quota_bytes {
            if projected > quota {
                return Err(StorageError::QuotaExceeded(format!(
                    "writing '{}' needs {} bytes, quota is {} bytes",
                    key, projected, quota
                )));
            }
        }

        inner.entries.insert(key.to_string(), value.to_string());
        inner.used_bytes = projected;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.ensure_enabled()?;
        let mut inner = self.inner.write();
        if let Some(old) = inner.entries.remove(key) {
            inner.used_bytes -= key.len() + old.len();
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.ensure_enabled()?;
        let mut inner = self.inner.write();
        inner.entries.clear();
        inner.used_bytes = 0;
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        self.ensure_enabled()?;
        Ok(self.inner.read().entries.len())
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        self.ensure_enabled()?;
        Ok(self.inner.read().entries.keys().nth(index).cloned())
    }
}
