//! Stages - the processing units attached to a channel's subscriber pipelines.
//!
//! Every stage implements [`Stage`]: it consumes one message and answers with
//! an [`Outcome`]. The dispatcher interprets outcomes uniformly:
//!
//! | Outcome | Meaning |
//! |---|---|
//! | `Continue(m)` | hand `m` to the next stage of the same pipeline |
//! | `Forward(m, channel)` | resend `m` on another channel, pipeline ends |
//! | `Drop` | the message was consumed, pipeline ends |
//! | `Fail(cause)` | unrecovered failure, handled per channel kind |
//!
//! ## Provided stages
//!
//! - [`Router`] - content-based routing to a computed channel name
//! - [`Filter`] - predicate with a discard channel for rejections
//! - [`Enricher`] - adds framework headers
//! - [`Transformer`] - same-type payload transform
//! - [`WireTap`] - copies the message to a tap channel
//! - [`ServiceActivator`] - terminal handler with dead-letter capture
//! - [`DeadLetterSink`] - terminal sink for the dead-letter channel

mod activator;
mod dead_letter;
mod enricher;
mod error;
mod filter;
mod router;
mod transformer;
mod wire_tap;

pub mod filters;
pub mod routes;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::channel::Registry;
use crate::message::Message;

pub use activator::{ServiceActivator, DEFAULT_DEAD_LETTER_CHANNEL};
pub use dead_letter::{DeadLetter, DeadLetterSink};
pub use enricher::Enricher;
pub use error::HandlerError;
pub(crate) use error::panic_cause;
pub use filter::Filter;
pub use router::Router;
pub use transformer::Transformer;
pub use wire_tap::WireTap;

/// Result of a stage processing one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Pass the (possibly new) message to the next stage in the pipeline.
    Continue(Message<T>),
    /// Resend the message on the named channel.
    Forward(Message<T>, String),
    /// The message was consumed.
    Drop,
    /// The stage failed and did not redirect the message.
    Fail(String),
}

impl<T> Outcome<T> {
    /// Forward a message to a channel.
    pub fn forward(message: Message<T>, channel: impl Into<String>) -> Self {
        Outcome::Forward(message, channel.into())
    }

    /// The message this outcome carries, if any.
    pub fn message(&self) -> Option<&Message<T>> {
        match self {
            Outcome::Continue(message) | Outcome::Forward(message, _) => Some(message),
            Outcome::Drop | Outcome::Fail(_) => None,
        }
    }
}

/// The capability a stage provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Route,
    Filter,
    Enrich,
    Transform,
    Tap,
    Handle,
    DeadLetter,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Route => "route",
            StageKind::Filter => "filter",
            StageKind::Enrich => "enrich",
            StageKind::Transform => "transform",
            StageKind::Tap => "tap",
            StageKind::Handle => "handle",
            StageKind::DeadLetter => "dead_letter",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a stage can see of the delivery it takes part in.
pub struct StageContext<'a, T> {
    registry: &'a Registry<T>,
    channel: &'a str,
}

impl<'a, T> StageContext<'a, T> {
    pub(crate) fn new(registry: &'a Registry<T>, channel: &'a str) -> Self {
        Self { registry, channel }
    }

    /// The registry the current channel belongs to.
    pub fn registry(&self) -> &'a Registry<T> {
        self.registry
    }

    /// Name of the channel whose pipeline is running.
    pub fn channel(&self) -> &'a str {
        self.channel
    }
}

/// A processing unit on a channel pipeline.
///
/// Implementations must be thread-safe: the same stage instance may process
/// messages from several producer threads, or from concurrently running
/// publish/subscribe subscribers, at once.
pub trait Stage<T>: Send + Sync {
    /// Name used in logs, observer events and failure reports.
    fn name(&self) -> &str;

    fn kind(&self) -> StageKind;

    /// Channel names this stage may forward to.
    ///
    /// Checked when the registry is built so a typo fails at startup rather
    /// than on the first message.
    fn targets(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Process one message.
    fn process(&self, message: Message<T>, ctx: &StageContext<'_, T>) -> Outcome<T>;
}
