use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::message::{Headers, Message, Payload};
use crate::stage::{Outcome, StageKind};

/// What happened to a message at one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventOutcome {
    /// Passed on to the next stage of the same pipeline.
    Continued,
    /// Resent on another channel (route decision, discard, dead-letter capture).
    Forwarded { channel: String },
    /// Consumed by a terminal stage.
    Completed,
    /// Failed without redirection, or a contained failure (tap, subscriber).
    Failed { cause: String },
}

impl EventOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            EventOutcome::Continued => "continued",
            EventOutcome::Forwarded { .. } => "forwarded",
            EventOutcome::Completed => "completed",
            EventOutcome::Failed { .. } => "failed",
        }
    }
}

/// A single stage transition, as exposed to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    pub stage: String,
    pub kind: StageKind,
    pub channel: String,
    /// Payload after the stage ran (or before it, when it produced no message).
    pub payload: Value,
    pub headers: Headers,
    pub outcome: EventOutcome,
}

impl StageEvent {
    /// Describe `outcome`, falling back to `input` for payload and headers.
    pub(crate) fn from_outcome<T: Payload>(
        stage: &str,
        kind: StageKind,
        channel: &str,
        input: &Message<T>,
        outcome: &Outcome<T>,
    ) -> Self {
        let shown = outcome.message().unwrap_or(input);
        let outcome = match outcome {
            Outcome::Continue(_) => EventOutcome::Continued,
            Outcome::Forward(_, target) => EventOutcome::Forwarded {
                channel: target.clone(),
            },
            Outcome::Drop => EventOutcome::Completed,
            Outcome::Fail(cause) => EventOutcome::Failed {
                cause: cause.clone(),
            },
        };
        Self::new(stage, kind, channel, shown, outcome)
    }

    pub(crate) fn new<T: Payload>(
        stage: &str,
        kind: StageKind,
        channel: &str,
        message: &Message<T>,
        outcome: EventOutcome,
    ) -> Self {
        Self {
            stage: stage.to_string(),
            kind,
            channel: channel.to_string(),
            payload: serde_json::to_value(message.payload()).unwrap_or(Value::Null),
            headers: message.headers().clone(),
            outcome,
        }
    }

    /// The failure cause, if this event reports one.
    pub fn cause(&self) -> Option<&str> {
        match &self.outcome {
            EventOutcome::Failed { cause } => Some(cause),
            _ => None,
        }
    }

    /// The channel the message was forwarded to, if any.
    pub fn forwarded_to(&self) -> Option<&str> {
        match &self.outcome {
            EventOutcome::Forwarded { channel } => Some(channel),
            _ => None,
        }
    }
}
