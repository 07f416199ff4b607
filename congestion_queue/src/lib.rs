//! Blocking queues used by the congestion pipeline.
//!
//! The queue here is generic and knows nothing about traffic records.

mod bounded;

pub use bounded::{BoundedQueue, Closed, PopTimeoutError, PushError, TryPopError, TryPushError};
