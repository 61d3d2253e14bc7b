use std::fmt;

/// Error type for channel wiring and delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// No channel is registered under this name.
    UnknownChannel(String),
    /// Two channels were registered under the same name.
    DuplicateChannel(String),
    /// The channel's subscriber layout is invalid for its kind.
    MalformedTopology { channel: String, reason: String },
    /// A stage on a direct channel failed and nothing redirected the failure.
    StageFailed {
        channel: String,
        stage: String,
        cause: String,
    },
}

impl ChannelError {
    /// Returns true for errors that can only come from wiring, never from a message.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, ChannelError::StageFailed { .. })
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::UnknownChannel(name) => write!(f, "unknown channel: {}", name),
            ChannelError::DuplicateChannel(name) => {
                write!(f, "channel registered twice: {}", name)
            }
            ChannelError::MalformedTopology { channel, reason } => {
                write!(f, "malformed topology on channel {}: {}", channel, reason)
            }
            ChannelError::StageFailed {
                channel,
                stage,
                cause,
            } => write!(
                f,
                "stage {} on channel {} failed: {}",
                stage, channel, cause
            ),
        }
    }
}

impl std::error::Error for ChannelError {}
