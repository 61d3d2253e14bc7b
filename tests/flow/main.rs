//! Number flow integration tests.
//!
//! Drives the fully wired flow through its gateway:
//! - Routing scenarios for even, odd, negative and zero inputs
//! - Handler failures captured on the dead-letter channel
//! - Concurrent producers sharing one flow
//! - Observers watching every stage transition

mod support;
mod concurrency;
mod failures;
mod observers;
mod scenarios;
