//! Config - channel names and failure rules for the number flow.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```
//! use routed_rust::config::FlowConfig;
//!
//! let config = FlowConfig::from_json(r#"{ "fail_on_multiple_of": 8 }"#).unwrap();
//! assert_eq!(config.even_channel, "even");
//! assert_eq!(config.fail_on_multiple_of, Some(8));
//! ```

mod error;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

/// Wiring configuration for [`NumberFlow`](crate::flow::NumberFlow).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Channel the gateway sends on; routed by parity.
    pub input_channel: String,
    pub even_channel: String,
    pub odd_channel: String,
    /// Receives filter rejections.
    pub discard_channel: String,
    /// Receives handler failures.
    pub dead_letter_channel: String,
    /// Receives a copy of every message sent on the input channel.
    pub wire_tap_channel: String,
    /// Even handler fails for multiples of this number.
    pub fail_on_multiple_of: Option<i64>,
    /// Run the even channel's subscribers concurrently.
    pub parallel_fanout: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            input_channel: "numbers".to_string(),
            even_channel: "even".to_string(),
            odd_channel: "odd".to_string(),
            discard_channel: "discard".to_string(),
            dead_letter_channel: "dead-letter".to_string(),
            wire_tap_channel: "wire-tap-input".to_string(),
            fail_on_multiple_of: None,
            parallel_fanout: false,
        }
    }
}

impl FlowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FlowConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json(&text)
    }

    /// Enable the simulated handler failure for multiples of `divisor`.
    pub fn with_failure_on_multiple_of(mut self, divisor: i64) -> Self {
        self.fail_on_multiple_of = Some(divisor);
        self
    }

    pub fn with_parallel_fanout(mut self, parallel: bool) -> Self {
        self.parallel_fanout = parallel;
        self
    }

    pub fn with_input_channel(mut self, name: impl Into<String>) -> Self {
        self.input_channel = name.into();
        self
    }

    pub fn with_discard_channel(mut self, name: impl Into<String>) -> Self {
        self.discard_channel = name.into();
        self
    }

    pub fn with_dead_letter_channel(mut self, name: impl Into<String>) -> Self {
        self.dead_letter_channel = name.into();
        self
    }

    pub fn with_wire_tap_channel(mut self, name: impl Into<String>) -> Self {
        self.wire_tap_channel = name.into();
        self
    }

    /// All channel names in wiring order.
    pub fn channel_names(&self) -> [&str; 6] {
        [
            self.input_channel.as_str(),
            self.even_channel.as_str(),
            self.odd_channel.as_str(),
            self.discard_channel.as_str(),
            self.dead_letter_channel.as_str(),
            self.wire_tap_channel.as_str(),
        ]
    }

    /// Whether the even handler should fail for `n`.
    pub fn fails_on(&self, n: i64) -> bool {
        matches!(self.fail_on_multiple_of, Some(d) if d != 0 && n.wrapping_rem(d) == 0)
    }

    /// Reject empty or duplicated channel names and a zero divisor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for name in self.channel_names() {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("channel names must not be empty".into()));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!(
                    "channel name '{}' is used twice",
                    name
                )));
            }
        }
        if self.fail_on_multiple_of == Some(0) {
            return Err(ConfigError::Invalid(
                "fail_on_multiple_of must not be zero".into(),
            ));
        }
        Ok(())
    }
}
