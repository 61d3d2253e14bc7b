//! Gateway - the typed ingress of the engine.
//!
//! A gateway wraps plain values into messages with empty headers and sends
//! them on one configured input channel. It performs no business logic.
//!
//! ```ignore
//! let gateway = Gateway::<i64>::new(&registry, "numbers")?;
//! gateway.send_number(4)?;
//! ```

use tracing::trace;

use crate::channel::{ChannelError, Registry};
use crate::message::{Message, Payload};

/// Typed entry point bound to an input channel.
///
/// Cheap to clone; clones can be moved to producer threads.
pub struct Gateway<T> {
    registry: Registry<T>,
    input: String,
}

impl<T> Clone for Gateway<T> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            input: self.input.clone(),
        }
    }
}

impl<T> Gateway<T> {
    /// Bind a gateway to `input`.
    ///
    /// Fails with `ChannelError::UnknownChannel` when the channel is not
    /// registered; callers treat this as a fatal startup error.
    pub fn new(registry: &Registry<T>, input: impl Into<String>) -> Result<Self, ChannelError> {
        let input = input.into();
        registry.resolve(&input)?;
        Ok(Self {
            registry: registry.clone(),
            input,
        })
    }

    pub fn input_channel(&self) -> &str {
        &self.input
    }

    pub fn registry(&self) -> &Registry<T> {
        &self.registry
    }
}

impl<T: Payload> Gateway<T> {
    /// Wrap `payload` in a message with empty headers and send it.
    ///
    /// Returns only after delivery finished. Failures on direct channels
    /// that no handler redirected are returned here.
    pub fn send(&self, payload: T) -> Result<(), ChannelError> {
        trace!(channel = %self.input, "gateway send");
        self.registry.send(&self.input, Message::new(payload))
    }
}

impl Gateway<i64> {
    /// Ingress for numeric producers.
    pub fn send_number(&self, value: i64) -> Result<(), ChannelError> {
        self.send(value)
    }
}
