//! Typed Storage Module
//!
//! Façade composing the namespacer, the codec and a schema over a
//! [`StorageMedium`].

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::config::StorageConfig;
use crate::error::Result;
use crate::storage::codec::{decode_candidate, encode};
use crate::storage::medium::StorageMedium;
use crate::storage::namespace::{logical_key, physical_key};
use crate::storage::schema::{Schema, Validation};
use crate::tasks::{ExpiryHandle, ExpiryScheduler, TokioScheduler};

/// Key written and removed by the availability probe.
const PROBE_KEY: &str = "__test";

// == Typed Storage ==
/// Typed accessor over a string key-value medium.
///
/// Values are encoded on write, and decoded then validated on read. Reads
/// never fail because of what is stored: absent, unparseable or rejected
/// entries all yield the caller's fallback. Failures of the medium itself
/// are returned unchanged.
///
/// The namespace only affects keys computed after it changes; entries
/// already written under another namespace keep their physical keys.
pub struct TypedStorage<M> {
    /// Underlying medium, supplied and owned by the caller
    medium: M,
    /// Prefix applied to every logical key
    namespace: Option<String>,
    /// Runs the deletions armed by `write_with_expiration`
    scheduler: Arc<dyn ExpiryScheduler>,
}

impl<M: StorageMedium> TypedStorage<M> {
    // == Constructors ==
    /// Creates a façade with no namespace, expiring keys on the current tokio runtime.
    pub fn new(medium: M) -> Self {
        Self {
            medium,
            namespace: None,
            scheduler: Arc::new(TokioScheduler::new()),
        }
    }

    /// Creates a façade whose keys are prefixed with `namespace`.
    ///
    /// An empty namespace is treated as no namespace.
    pub fn with_namespace(medium: M, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let mut storage = Self::new(medium);
        if !namespace.is_empty() {
            storage.namespace = Some(namespace);
        }
        storage
    }

    /// Creates a façade using the namespace from `config`.
    pub fn from_config(medium: M, config: &StorageConfig) -> Self {
        match &config.namespace {
            Some(namespace) => Self::with_namespace(medium, namespace.clone()),
            None => Self::new(medium),
        }
    }

    /// Replaces the scheduler used for expiring writes.
    pub fn with_scheduler(mut self, scheduler: Arc<dyn ExpiryScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    // == Namespace ==
    /// Returns the current namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Replaces the namespace for all subsequent operations.
    ///
    /// Keys already written are not renamed. An empty string is kept as the
    /// namespace but produces unprefixed keys.
    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = Some(namespace.into());
    }

    /// Removes the namespace; subsequent keys are used as-is.
    pub fn clear_namespace(&mut self) {
        self.namespace = None;
    }

    /// Physical key that `key` maps to under the current namespace.
    pub fn physical_key(&self, key: &str) -> String {
        physical_key(self.namespace(), key)
    }

    /// Borrows the underlying medium.
    pub fn medium(&self) -> &M {
        &self.medium
    }

    // == Write ==
    /// Stores `value` under `key`, overwriting any existing entry.
    ///
    /// Strings, numbers and booleans are stored as plain text, everything
    /// else as JSON.
    ///
    /// # Errors
    /// Returns a serialization error if `value` has no JSON form, or the
    /// medium's error if the write fails.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let physical = self.physical_key(key);
        let encoded = encode(value)?;
        self.medium.set_item(&physical, &encoded)?;
        debug!(key = %physical, bytes = encoded.len(), "Stored value");
        Ok(())
    }

    // == Read ==
    /// Reads `key`, validating the stored value against `schema`.
    ///
    /// Returns `fallback` when the key is absent or the decoded value is
    /// rejected. An accepted value is returned as the schema produced it,
    /// which may differ from what was stored.
    ///
    /// # Errors
    /// Only failures of the medium are returned.
    pub fn read<T, S>(&self, key: &str, fallback: T, schema: &S) -> Result<T>
    where
        S: Schema<T> + ?Sized,
    {
        let Some(candidate) = self.read_value(key)? else {
            debug!(key = %self.physical_key(key), reason = "absent", "Read returned fallback");
            return Ok(fallback);
        };

        match schema.validate(candidate) {
            Validation::Accepted(value) => Ok(value),
            Validation::Rejected => {
                debug!(key = %self.physical_key(key), reason = "rejected", "Read returned fallback");
                Ok(fallback)
            }
        }
    }

    /// Reads `key` without a schema, trusting the stored shape.
    ///
    /// The decoded value is converted to `T` directly; if that conversion
    /// fails the result is still `fallback`.
    pub fn read_or<T: DeserializeOwned>(&self, key: &str, fallback: T) -> Result<T> {
        Ok(self
            .read_value(key)?
            .and_then(|candidate| serde_json::from_value(candidate).ok())
            .unwrap_or(fallback))
    }

    /// Reads the decoded, unvalidated value under `key`, or `None` if absent.
    pub fn read_value(&self, key: &str) -> Result<Option<Value>> {
        let physical = self.physical_key(key);
        let raw = self.medium.get_item(&physical)?;
        trace!(key = %physical, found = raw.is_some(), "Read raw value");
        Ok(raw.as_deref().map(decode_candidate))
    }

    // == Exists ==
    /// Returns true if an entry exists under `key`, whatever its shape.
    pub fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.medium.get_item(&self.physical_key(key))?.is_some())
    }

    // == Remove ==
    /// Removes `key`. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<()> {
        let physical = self.physical_key(key);
        self.medium.remove_item(&physical)?;
        debug!(key = %physical, "Removed value");
        Ok(())
    }

    // == Clear ==
    /// Removes every entry in the medium, across all namespaces.
    pub fn clear(&self) -> Result<()> {
        self.medium.clear()?;
        info!("Cleared storage");
        Ok(())
    }

    // == Length ==
    /// Number of entries in the medium, across all namespaces.
    pub fn length(&self) -> Result<usize> {
        self.medium.len()
    }

    // == Keys ==
    /// Logical keys of the entries under the current namespace.
    ///
    /// With no namespace every physical key is returned.
    ///
    /// Walks the medium with one [`StorageMedium::key`] lookup per index, so
    /// the cost depends on how the medium resolves an index; for
    /// [`MemoryStorage`](crate::storage::MemoryStorage) the walk is quadratic
    /// in the number of entries.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for index in 0..self.medium.len()? {
            if let Some(physical) = self.medium.key(index)? {
                if let Some(logical) = logical_key(self.namespace(), &physical) {
                    keys.push(logical.to_string());
                }
            }
        }
        Ok(keys)
    }

    // == Availability Probe ==
    /// Reports whether `medium` accepts a write followed by a delete.
    ///
    /// Call this before relying on storage that may be disabled.
    pub fn is_available(medium: &M) -> bool {
        medium
            .set_item(PROBE_KEY, "1")
            .and_then(|()| medium.remove_item(PROBE_KEY))
            .is_ok()
    }
}

impl<M: StorageMedium + Clone + 'static> TypedStorage<M> {
    // == Write With Expiration ==
    /// Stores `value` under `key` and arms a timer deleting it after `ttl`.
    ///
    /// The timer captures the physical key at call time: later namespace
    /// changes do not redirect it. If the key is removed or overwritten
    /// before the timer fires, the timer still deletes whatever is stored
    /// under that physical key, or does nothing if it is absent.
    ///
    /// The returned handle can cancel the deletion; dropping it does not.
    ///
    /// The timer owns a clone of the medium, so `M` must be a handle onto
    /// shared entries: [`MemoryStorage`](crate::storage::MemoryStorage),
    /// `Arc<_>` or `&'static _`. A medium whose clone copies its entries
    /// would expire the key in the copy only.
    ///
    /// # Errors
    /// Write errors as for [`TypedStorage::write`]. If no scheduler can arm
    /// the timer, the value stays written and the scheduler error is returned.
    pub fn write_with_expiration<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<ExpiryHandle> {
        let physical = self.physical_key(key);
        self.write(key, value)?;

        let medium = self.medium.clone();
        let expired_key = physical.clone();
        let handle = self.scheduler.schedule(
            ttl,
            Box::new(move || match medium.remove_item(&expired_key) {
                Ok(()) => debug!(key = %expired_key, "Expired value"),
                Err(err) => warn!(key = %expired_key, error = %err, "Failed to expire value"),
            }),
        )?;

        debug!(key = %physical, ttl_ms = ttl.as_millis() as u64, "Armed expiry");
        Ok(handle)
    }
}
