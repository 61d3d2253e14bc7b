pub mod channel;
pub mod config;
pub mod flow;
pub mod gateway;
pub mod message;
pub mod observe;
pub mod producer;
pub mod stage;

pub use channel::{ChannelBuilder, ChannelError, ChannelKind, Pipeline, Registry};
pub use config::{ConfigError, FlowConfig};
pub use flow::{FlowError, NumberFlow, NumberFlowBuilder};
pub use gateway::Gateway;
pub use message::{Headers, Message, MessageError, Payload};
pub use observe::{EventOutcome, Observer, RecordingObserver, StageEvent, TracingObserver};
pub use producer::{ProducerStats, ProducerThread, SequenceCounter};
pub use stage::{
    DeadLetter, DeadLetterSink, Enricher, Filter, HandlerError, Outcome, Router,
    ServiceActivator, Stage, StageContext, StageKind, Transformer, WireTap,
};

// Re-export the emitter-backed observer when the `emitter` feature is on
#[cfg(feature = "emitter")]
pub use observe::EmitterObserver;
