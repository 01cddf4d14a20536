//! Transport-level retry for transient failures.

mod retry;

pub use retry::{RetryConfig, RetryPolicy};
