use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ChannelError;
use crate::stage::{Stage, StageKind};

/// Delivery policy of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// One subscriber, synchronous delivery, failures returned to the sender.
    Direct,
    /// Every subscriber gets its own copy; failures are contained per subscriber.
    PublishSubscribe,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Direct => f.write_str("direct"),
            ChannelKind::PublishSubscribe => f.write_str("publish_subscribe"),
        }
    }
}

/// An ordered chain of stages forming one subscriber of a channel.
///
/// Stages are linked by `Outcome::Continue`; the first stage that forwards,
/// drops or fails ends the pipeline.
pub struct Pipeline<T> {
    stages: Vec<Arc<dyn Stage<T>>>,
}

impl<T> Default for Pipeline<T> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<T> Pipeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn stage(mut self, stage: impl Stage<T> + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Append a stage that is shared with other pipelines or kept by the caller.
    pub fn shared(mut self, stage: Arc<dyn Stage<T>>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Arc<dyn Stage<T>>] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Name of the first stage, used to label the subscriber in logs.
    pub fn head(&self) -> &str {
        self.stages.first().map(|s| s.name()).unwrap_or("<empty>")
    }
}

/// A named channel with a fixed subscriber topology.
pub struct Channel<T> {
    name: String,
    kind: ChannelKind,
    subscribers: Vec<Pipeline<T>>,
    wire_tap: Option<String>,
    parallel: bool,
}

impl<T> Channel<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn subscribers(&self) -> &[Pipeline<T>] {
        &self.subscribers
    }

    /// Channel that receives a copy of every message sent here.
    pub fn wire_tap(&self) -> Option<&str> {
        self.wire_tap.as_deref()
    }

    /// Whether publish/subscribe subscribers run concurrently.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Every channel name this channel's stages and tap may send to.
    pub(crate) fn targets(&self) -> Vec<&str> {
        self.subscribers
            .iter()
            .flat_map(|p| p.stages())
            .flat_map(|s| s.targets())
            .chain(self.wire_tap.as_deref())
            .collect()
    }
}

/// Builder for a [`Channel`].
///
/// ## Example
///
/// ```ignore
/// let odd = ChannelBuilder::direct("odd").subscriber(
///     Pipeline::new()
///         .stage(Enricher::new("odd-enricher", "odd", "dead-letter"))
///         .stage(Filter::new("odd-filter", filters::positive, "discard"))
///         .stage(ServiceActivator::new("odd-handler", handle)),
/// );
/// ```
pub struct ChannelBuilder<T> {
    name: String,
    kind: ChannelKind,
    subscribers: Vec<Pipeline<T>>,
    wire_tap: Option<String>,
    parallel: bool,
}

impl<T> ChannelBuilder<T> {
    pub fn new(name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            subscribers: Vec::new(),
            wire_tap: None,
            parallel: false,
        }
    }

    /// Start a point-to-point channel.
    pub fn direct(name: impl Into<String>) -> Self {
        Self::new(name, ChannelKind::Direct)
    }

    /// Start a broadcast channel.
    pub fn publish_subscribe(name: impl Into<String>) -> Self {
        Self::new(name, ChannelKind::PublishSubscribe)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a subscriber pipeline. Registration order is delivery order.
    pub fn subscriber(mut self, pipeline: Pipeline<T>) -> Self {
        self.subscribers.push(pipeline);
        self
    }

    /// Add a subscriber consisting of a single stage.
    pub fn handler(self, stage: impl Stage<T> + 'static) -> Self {
        self.subscriber(Pipeline::new().stage(stage))
    }

    /// Copy every message sent on this channel to `tap_channel` before delivery.
    pub fn wire_tap(mut self, tap_channel: impl Into<String>) -> Self {
        self.wire_tap = Some(tap_channel.into());
        self
    }

    /// Run publish/subscribe subscribers concurrently on scoped threads.
    ///
    /// `send` still returns only after every subscriber finished; the
    /// registration order is no longer the invocation order.
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }

    /// Validate the subscriber layout and freeze the channel.
    pub fn build(self) -> Result<Channel<T>, ChannelError> {
        let malformed = |reason: &str| ChannelError::MalformedTopology {
            channel: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(malformed("channel name is empty"));
        }
        match (self.kind, self.subscribers.len()) {
            (_, 0) => return Err(malformed("no subscribers")),
            (ChannelKind::Direct, 1) => {}
            (ChannelKind::Direct, n) => {
                return Err(malformed(&format!(
                    "direct channel needs exactly one subscriber, got {}",
                    n
                )))
            }
            (ChannelKind::PublishSubscribe, _) => {}
        }
        if self.subscribers.iter().any(Pipeline::is_empty) {
            return Err(malformed("subscriber pipeline has no stages"));
        }
        if let Some(router) = self
            .subscribers
            .iter()
            .flat_map(Pipeline::stages)
            .find(|s| s.kind() == StageKind::Route && s.targets().is_empty())
        {
            return Err(malformed(&format!(
                "router {} declares no target channels",
                router.name()
            )));
        }
        if self.parallel && self.kind == ChannelKind::Direct {
            return Err(malformed("parallel delivery needs a publish/subscribe channel"));
        }
        if self.wire_tap.as_deref() == Some(self.name.as_str()) {
            return Err(malformed("channel cannot wire tap itself"));
        }

        Ok(Channel {
            name: self.name,
            kind: self.kind,
            subscribers: self.subscribers,
            wire_tap: self.wire_tap,
            parallel: self.parallel,
        })
    }
}
