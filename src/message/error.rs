use std::fmt;

/// Error type for message construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// A user stage tried to set a header owned by the framework.
    ReservedHeader(String),
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageError::ReservedHeader(key) => {
                write!(f, "header '{}' is reserved for the framework", key)
            }
        }
    }
}

impl std::error::Error for MessageError {}
