//! Error type for terminal handlers.

use std::any::Any;
use std::error::Error;
use std::fmt;

/// Failure raised by a handler closure inside a [`ServiceActivator`](super::ServiceActivator).
///
/// Any variant sends the in-flight message down the dead-letter path.
#[derive(Debug)]
pub enum HandlerError {
    /// Business logic refused the payload.
    Rejected(String),
    /// A configured failure rule fired (used to exercise the dead-letter path).
    Simulated(String),
    /// The handler closure panicked; holds the panic message.
    Panicked(String),
    /// Other error.
    Other(Box<dyn Error + Send + Sync>),
}

impl HandlerError {
    /// Wrap any error type.
    pub fn other(err: impl Error + Send + Sync + 'static) -> Self {
        HandlerError::Other(Box::new(err))
    }

    /// Turn a caught panic payload into a handler failure.
    pub(crate) fn from_panic(panic: &(dyn Any + Send)) -> Self {
        HandlerError::Panicked(panic_cause(panic))
    }
}

/// Text of a panic payload, for `&str` and `String` panics.
pub(crate) fn panic_cause(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::Rejected(msg) => write!(f, "rejected: {}", msg),
            HandlerError::Simulated(msg) => write!(f, "simulated failure: {}", msg),
            HandlerError::Panicked(msg) => write!(f, "handler panicked: {}", msg),
            HandlerError::Other(e) => write!(f, "handler error: {}", e),
        }
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandlerError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
