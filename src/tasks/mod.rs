//! Expiration Tasks Module
//!
//! Schedulers that run the deferred deletions armed by time-to-live writes.
//!
//! # Schedulers
//! - `TokioScheduler`: one spawned task per timer on a tokio runtime
//! - `ManualScheduler`: virtual clock advanced by the caller

mod expiry;
mod manual;

pub use expiry::{ExpiryHandle, ExpiryScheduler, ExpiryTask, TokioScheduler};
pub use manual::ManualScheduler;
