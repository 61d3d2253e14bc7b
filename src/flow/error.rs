use std::error::Error;
use std::fmt;

use crate::channel::ChannelError;
use crate::config::ConfigError;

/// Error type for wiring a flow. Both variants are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    Config(ConfigError),
    Channel(ChannelError),
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::Config(e) => write!(f, "flow config error: {}", e),
            FlowError::Channel(e) => write!(f, "flow wiring error: {}", e),
        }
    }
}

impl Error for FlowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FlowError::Config(e) => Some(e),
            FlowError::Channel(e) => Some(e),
        }
    }
}

impl From<ConfigError> for FlowError {
    fn from(err: ConfigError) -> Self {
        FlowError::Config(err)
    }
}

impl From<ChannelError> for FlowError {
    fn from(err: ChannelError) -> Self {
        FlowError::Channel(err)
    }
}
