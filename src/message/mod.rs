//! Message - the immutable envelope every channel carries.
//!
//! A `Message<T>` pairs a typed payload with a set of string-keyed headers.
//! Messages are never mutated in place: every builder method consumes the
//! message and returns a new one, so a clone handed to one subscriber can
//! never observe changes made by another.
//!
//! ## Example
//!
//! ```
//! use routed_rust::message::{headers, Message};
//!
//! let message = Message::new(4_i64)
//!     .with_header("origin", "sensor-7")
//!     .unwrap();
//!
//! assert_eq!(*message.payload(), 4);
//! assert_eq!(message.header_str("origin"), Some("sensor-7"));
//! assert!(message.with_header(headers::MESSAGE_ID, "x").is_err());
//! ```

mod error;
pub mod headers;
mod message;
mod payload;

pub use error::MessageError;
pub use headers::Headers;
pub use message::Message;
pub use payload::Payload;
