use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::dispatcher::Dispatcher;
use super::{Channel, ChannelBuilder, ChannelError, ChannelKind};
use crate::message::{Message, Payload};
use crate::observe::{EventOutcome, Observer, Observers, StageEvent};
use crate::stage::StageKind;

struct RegistryInner<T> {
    channels: HashMap<String, Channel<T>>,
    observers: Observers,
}

/// Process-wide mapping from channel name to channel.
///
/// Built once by [`RegistryBuilder`] and read-only afterwards. Cloning is
/// cheap and every clone sees the same channels, so a registry can be handed
/// to any number of producer threads without locking.
pub struct Registry<T> {
    inner: Arc<RegistryInner<T>>,
}

impl<T> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Registry<T> {
    /// Start wiring a registry.
    pub fn builder() -> RegistryBuilder<T> {
        RegistryBuilder::new()
    }

    /// Look up a channel by name.
    pub fn resolve(&self, name: &str) -> Result<ChannelRef<'_, T>, ChannelError> {
        self.inner
            .channels
            .get(name)
            .map(|channel| ChannelRef {
                registry: self,
                channel,
            })
            .ok_or_else(|| ChannelError::UnknownChannel(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.channels.contains_key(name)
    }

    /// Registered channel names, sorted.
    pub fn channel_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.channels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.channels.is_empty()
    }

    pub(crate) fn observers(&self) -> &Observers {
        &self.inner.observers
    }
}

impl<T: Payload> Registry<T> {
    /// Send a message on the named channel.
    pub fn send(&self, channel: &str, message: Message<T>) -> Result<(), ChannelError> {
        self.resolve(channel)?.send(message)
    }

    /// Copy `message` to `tap_channel`, containing every failure on the tap side.
    pub(crate) fn tap(&self, tap_channel: &str, message: &Message<T>, stage: &str, channel: &str) {
        trace!(tap = %tap_channel, channel = %channel, "wire tap copy");
        let outcome = match self.send(tap_channel, message.clone()) {
            Ok(()) => EventOutcome::Forwarded {
                channel: tap_channel.to_string(),
            },
            Err(err) => {
                warn!(tap = %tap_channel, channel = %channel, error = %err, "wire tap delivery failed");
                EventOutcome::Failed {
                    cause: err.to_string(),
                }
            }
        };
        if !self.observers().is_empty() {
            let event = StageEvent::new(stage, StageKind::Tap, channel, message, outcome);
            self.observers().notify(&event);
        }
    }
}

/// A resolved channel, ready to send on.
pub struct ChannelRef<'a, T> {
    registry: &'a Registry<T>,
    channel: &'a Channel<T>,
}

impl<'a, T> ChannelRef<'a, T> {
    pub fn name(&self) -> &'a str {
        self.channel.name()
    }

    pub fn kind(&self) -> ChannelKind {
        self.channel.kind()
    }

    pub fn channel(&self) -> &'a Channel<T> {
        self.channel
    }
}

impl<'a, T: Payload> ChannelRef<'a, T> {
    /// Deliver a message according to the channel's kind.
    ///
    /// Returns once every subscriber has finished. Only direct channels
    /// return stage failures; publish/subscribe failures are contained.
    pub fn send(&self, message: Message<T>) -> Result<(), ChannelError> {
        Dispatcher::new(self.registry).dispatch(self.channel, message)
    }
}

/// Explicit, ordered wiring of channels and observers.
///
/// ## Example
///
/// ```ignore
/// let registry = Registry::builder()
///     .channel(ChannelBuilder::direct("numbers").handler(router))
///     .channel(ChannelBuilder::direct("odd").subscriber(odd_pipeline))
///     .channel(ChannelBuilder::publish_subscribe("dead-letter").handler(sink))
///     .observer(TracingObserver::new())
///     .build()?;
/// ```
pub struct RegistryBuilder<T> {
    channels: Vec<ChannelBuilder<T>>,
    observers: Observers,
}

impl<T> Default for RegistryBuilder<T> {
    fn default() -> Self {
        Self {
            channels: Vec::new(),
            observers: Observers::default(),
        }
    }
}

impl<T> RegistryBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel.
    pub fn channel(mut self, channel: ChannelBuilder<T>) -> Self {
        self.channels.push(channel);
        self
    }

    /// Attach an observer that receives every stage event.
    pub fn observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Attach an observer the caller keeps a handle to.
    pub fn shared_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Validate the topology and freeze it.
    ///
    /// Fails on duplicate names, malformed channels, and any stage or wire
    /// tap that names a channel which is not registered.
    pub fn build(self) -> Result<Registry<T>, ChannelError> {
        let mut channels = HashMap::with_capacity(self.channels.len());
        for builder in self.channels {
            let channel = builder.build()?;
            if channels.contains_key(channel.name()) {
                return Err(ChannelError::DuplicateChannel(channel.name().to_string()));
            }
            channels.insert(channel.name().to_string(), channel);
        }

        for channel in channels.values() {
            if let Some(missing) = channel
                .targets()
                .into_iter()
                .find(|target| !channels.contains_key(*target))
            {
                return Err(ChannelError::UnknownChannel(missing.to_string()));
            }
        }

        debug!(
            channels = channels.len(),
            observers = self.observers.len(),
            "registry built"
        );

        Ok(Registry {
            inner: Arc::new(RegistryInner {
                channels,
                observers: self.observers,
            }),
        })
    }
}
