//! Producer - background threads feeding numbers into a gateway.
//!
//! - `SequenceCounter` - shared monotonically increasing counter
//! - `ProducerThread` - a thread that sends one number per interval
//! - `positive_sequence` / `negative_random` - number generators
//!
//! ```ignore
//! use routed_rust::producer::{negative_random, positive_sequence, ProducerThread, SequenceCounter};
//! use std::time::Duration;
//!
//! let counter = SequenceCounter::new();
//! let positives = ProducerThread::spawn(
//!     flow.gateway().clone(),
//!     Duration::from_millis(100),
//!     positive_sequence(counter.clone()),
//! );
//! let negatives = ProducerThread::spawn(
//!     flow.gateway().clone(),
//!     Duration::from_millis(250),
//!     negative_random(1..=100),
//! );
//!
//! // ... later ...
//! let stats = positives.stop();
//! println!("sent {} numbers", stats.sent);
//! negatives.stop();
//! ```

mod counter;
mod generators;
mod thread;

pub use counter::SequenceCounter;
pub use generators::{negative_random, positive_sequence};
pub use thread::{ProducerStats, ProducerThread};
