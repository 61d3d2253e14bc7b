//! Flow - the reference wiring of the number pipelines.
//!
//! ```text
//! Gateway::send_number(n)
//!        │
//!        ▼
//! "numbers" (direct) ──tap──▶ "wire-tap-input" (pub/sub) ─▶ tap sink
//!        │ Router (parity)
//!   ┌────┴──────────────────────────────┐
//!   ▼                                   ▼
//! "even" (pub/sub)                    "odd" (direct)
//!   ├─ Enricher ▸ Filter(n >= 0) ▸ Handler    Enricher ▸ Filter(n > 0) ▸ Handler
//!   └─ ServiceActivator (raw even numbers)
//!            │ rejected                 │ failed
//!            ▼                          ▼
//!       "discard" (direct)         "dead-letter" (pub/sub)
//! ```
//!
//! Handlers turn `n` into `"Number n"` and hand it to the display sink. With
//! [`FlowConfig::fail_on_multiple_of`] set, the even handler fails for
//! multiples of that number and the message lands on the dead-letter channel.
//!
//! Every sink defaults to a `tracing` log line and can be replaced:
//!
//! ```ignore
//! let flow = NumberFlow::builder(FlowConfig::default().with_failure_on_multiple_of(8))
//!     .on_display(|flow, text| println!("[{}] {}", flow, text))
//!     .on_dead_letter(|letter| eprintln!("failed: {:?}", letter.cause))
//!     .observer(TracingObserver::new())
//!     .build()?;
//!
//! flow.gateway().send_number(4)?;
//! ```

mod error;

use std::sync::Arc;

use tracing::{error, info};

use crate::channel::{ChannelBuilder, ChannelError, Pipeline, Registry};
use crate::config::FlowConfig;
use crate::gateway::Gateway;
use crate::message::{headers, Message};
use crate::observe::Observer;
use crate::stage::{
    filters, routes, DeadLetter, DeadLetterSink, Enricher, Filter, HandlerError, Router,
    ServiceActivator,
};

pub use error::FlowError;

type DisplaySink = Arc<dyn Fn(&str, &str) + Send + Sync>;
type NumberSink = Arc<dyn Fn(i64) + Send + Sync>;
type MessageSink = Arc<dyn Fn(&Message<i64>) + Send + Sync>;
type DeadLetterFn = Arc<dyn Fn(DeadLetter<i64>) + Send + Sync>;

/// Display form produced by the pipeline handlers.
pub fn display_form(n: i64) -> String {
    format!("Number {}", n)
}

/// The wired number flow: registry plus its gateway.
#[derive(Clone)]
pub struct NumberFlow {
    config: FlowConfig,
    registry: Registry<i64>,
    gateway: Gateway<i64>,
}

impl NumberFlow {
    pub fn builder(config: FlowConfig) -> NumberFlowBuilder {
        NumberFlowBuilder::new(config)
    }

    pub fn gateway(&self) -> &Gateway<i64> {
        &self.gateway
    }

    pub fn registry(&self) -> &Registry<i64> {
        &self.registry
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Shortcut for `gateway().send_number(n)`.
    pub fn send_number(&self, n: i64) -> Result<(), ChannelError> {
        self.gateway.send_number(n)
    }
}

/// Builder for [`NumberFlow`]; every sink is optional.
pub struct NumberFlowBuilder {
    config: FlowConfig,
    display: DisplaySink,
    even_activator: NumberSink,
    discard: MessageSink,
    dead_letter: DeadLetterFn,
    tap: MessageSink,
    observers: Vec<Arc<dyn Observer>>,
}

impl NumberFlowBuilder {
    pub fn new(config: FlowConfig) -> Self {
        Self {
            config,
            display: Arc::new(|flow: &str, text: &str| info!(flow = %flow, "{}", text)),
            even_activator: Arc::new(|n: i64| info!(payload = n, "even service activator")),
            discard: Arc::new(|m: &Message<i64>| {
                info!(payload = *m.payload(), "discarded by filter")
            }),
            dead_letter: Arc::new(|letter: DeadLetter<i64>| {
                error!(
                    payload = letter.payload,
                    cause = letter.cause.as_deref().unwrap_or("<none>"),
                    stage = letter.failed_stage.as_deref().unwrap_or("<none>"),
                    "dead letter"
                )
            }),
            tap: Arc::new(|m: &Message<i64>| info!(payload = *m.payload(), "wire tap")),
            observers: Vec::new(),
        }
    }

    /// Receives `(source flow, "Number n")` for every handled message.
    pub fn on_display<F>(mut self, sink: F) -> Self
    where
        F: Fn(&str, &str) + Send + Sync + 'static,
    {
        self.display = Arc::new(sink);
        self
    }

    /// Receives every even number, including the negative ones the even
    /// filter rejects. This raw subscriber is the one place outside the
    /// discard sink where negative numbers are visible.
    pub fn on_even_activator<F>(mut self, sink: F) -> Self
    where
        F: Fn(i64) + Send + Sync + 'static,
    {
        self.even_activator = Arc::new(sink);
        self
    }

    /// Receives every message rejected by either filter.
    pub fn on_discard<F>(mut self, sink: F) -> Self
    where
        F: Fn(&Message<i64>) + Send + Sync + 'static,
    {
        self.discard = Arc::new(sink);
        self
    }

    /// Receives every message whose handler failed.
    pub fn on_dead_letter<F>(mut self, sink: F) -> Self
    where
        F: Fn(DeadLetter<i64>) + Send + Sync + 'static,
    {
        self.dead_letter = Arc::new(sink);
        self
    }

    /// Receives a copy of every message sent through the gateway.
    pub fn on_tap<F>(mut self, sink: F) -> Self
    where
        F: Fn(&Message<i64>) + Send + Sync + 'static,
    {
        self.tap = Arc::new(sink);
        self
    }

    pub fn observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Validate the config, wire every channel and bind the gateway.
    pub fn build(self) -> Result<NumberFlow, FlowError> {
        self.config.validate()?;
        let config = &self.config;

        let mut builder = Registry::builder()
            .channel(
                ChannelBuilder::direct(config.input_channel.as_str())
                    .handler(
                        Router::new(
                            "parity-router",
                            routes::parity(&config.even_channel, &config.odd_channel),
                        )
                        .with_targets([&config.even_channel, &config.odd_channel]),
                    )
                    .wire_tap(config.wire_tap_channel.as_str()),
            )
            .channel(self.even_channel())
            .channel(self.odd_channel())
            .channel(
                ChannelBuilder::direct(config.discard_channel.as_str())
                    .handler(self.activator("discard-handler", &self.discard)),
            )
            .channel(
                ChannelBuilder::publish_subscribe(config.dead_letter_channel.as_str()).handler({
                    let sink = Arc::clone(&self.dead_letter);
                    DeadLetterSink::new("dead-letter-handler", move |letter| sink(letter))
                }),
            )
            .channel(
                ChannelBuilder::publish_subscribe(config.wire_tap_channel.as_str())
                    .handler(self.activator("wire-tap-logger", &self.tap)),
            );
        builder = self.observers.iter().fold(builder, |builder, observer| {
            builder.shared_observer(Arc::clone(observer))
        });

        let registry = builder.build()?;
        let gateway = Gateway::new(&registry, config.input_channel.as_str())?;

        Ok(NumberFlow {
            config: self.config.clone(),
            registry,
            gateway,
        })
    }

    fn even_channel(&self) -> ChannelBuilder<i64> {
        let config = &self.config;
        let even_activator = Arc::clone(&self.even_activator);

        let channel = ChannelBuilder::publish_subscribe(config.even_channel.as_str())
            .subscriber(
                Pipeline::new()
                    .stage(Enricher::new(
                        "even-enricher",
                        "even",
                        config.dead_letter_channel.as_str(),
                    ))
                    .stage(Filter::new(
                        "even-filter",
                        filters::non_negative,
                        config.discard_channel.as_str(),
                    ))
                    .stage(self.handler("even-handler", true)),
            )
            // Sits beside the filtered pipeline, so it also sees negative even
            // numbers. The pipeline itself sends them to discard.
            .handler(
                ServiceActivator::new("even-service-activator", move |m: &Message<i64>| {
                    even_activator(*m.payload());
                    Ok(())
                })
                .with_default_error_channel(config.dead_letter_channel.as_str()),
            );

        if config.parallel_fanout {
            channel.parallel()
        } else {
            channel
        }
    }

    fn odd_channel(&self) -> ChannelBuilder<i64> {
        let config = &self.config;
        ChannelBuilder::direct(config.odd_channel.as_str()).subscriber(
            Pipeline::new()
                .stage(Enricher::new(
                    "odd-enricher",
                    "odd",
                    config.dead_letter_channel.as_str(),
                ))
                .stage(Filter::new(
                    "odd-filter",
                    filters::positive,
                    config.discard_channel.as_str(),
                ))
                .stage(self.handler("odd-handler", false)),
        )
    }

    /// Terminal pipeline handler: display form, or a simulated failure when
    /// `may_fail` and the configured rule matches.
    ///
    /// The `"Number n"` transform runs inside the handler. A registry carries
    /// one payload type, so a `String` display form cannot travel between
    /// stages of an `i64` pipeline; [`display_form`] keeps it a separate step.
    fn handler(&self, name: &str, may_fail: bool) -> ServiceActivator<i64> {
        let display = Arc::clone(&self.display);
        let rule = may_fail.then(|| self.config.clone());

        ServiceActivator::new(name, move |m: &Message<i64>| {
            let n = *m.payload();
            if let Some(config) = rule.as_ref().filter(|c| c.fails_on(n)) {
                return Err(HandlerError::Simulated(format!(
                    "{} is a multiple of {}",
                    n,
                    config.fail_on_multiple_of.unwrap_or_default()
                )));
            }
            let flow = m.header_str(headers::SOURCE_FLOW).unwrap_or("unknown");
            display(flow, &display_form(n));
            Ok(())
        })
        .with_default_error_channel(self.config.dead_letter_channel.as_str())
    }

    /// Terminal sink that cannot fail.
    fn activator(&self, name: &str, sink: &MessageSink) -> ServiceActivator<i64> {
        let sink = Arc::clone(sink);
        ServiceActivator::new(name, move |m: &Message<i64>| {
            sink(m);
            Ok(())
        })
        .with_default_error_channel(self.config.dead_letter_channel.as_str())
    }
}
