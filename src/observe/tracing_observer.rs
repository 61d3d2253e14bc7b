use tracing::{debug, info, warn};

use super::{EventOutcome, Observer, StageEvent};
use crate::stage::StageKind;

/// Logging collaborator: turns stage events into structured `tracing` events.
///
/// Failures log at `warn`, terminal completions and dead-letter arrivals at
/// `info`, everything else at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        TracingObserver
    }
}

impl Observer for TracingObserver {
    fn observe(&self, event: &StageEvent) {
        let headers = serde_json::to_string(&event.headers).unwrap_or_default();
        match &event.outcome {
            EventOutcome::Failed { cause } => warn!(
                stage = %event.stage,
                kind = %event.kind,
                channel = %event.channel,
                payload = %event.payload,
                headers = %headers,
                cause = %cause,
                "stage failed"
            ),
            EventOutcome::Completed if event.kind == StageKind::DeadLetter => info!(
                stage = %event.stage,
                channel = %event.channel,
                payload = %event.payload,
                headers = %headers,
                "dead letter received"
            ),
            EventOutcome::Completed => info!(
                stage = %event.stage,
                kind = %event.kind,
                channel = %event.channel,
                payload = %event.payload,
                "message handled"
            ),
            EventOutcome::Forwarded { channel } => debug!(
                stage = %event.stage,
                kind = %event.kind,
                channel = %event.channel,
                to = %channel,
                payload = %event.payload,
                headers = %headers,
                "message forwarded"
            ),
            EventOutcome::Continued => debug!(
                stage = %event.stage,
                kind = %event.kind,
                channel = %event.channel,
                payload = %event.payload,
                headers = %headers,
                "message continued"
            ),
        }
    }
}
