use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::message::{headers, Message};

use super::{Outcome, Stage, StageContext, StageKind};

/// Header enricher.
///
/// Produces a new message carrying every original header plus
/// `processedAt`, `messageId`, `sourceFlow` and `errorChannel`. Each
/// invocation overwrites those four keys with fresh values and leaves all
/// other headers alone. The payload is never altered.
pub struct Enricher {
    name: String,
    source_flow: String,
    error_channel: String,
    sequence: AtomicU64,
}

impl Enricher {
    pub fn new(
        name: impl Into<String>,
        source_flow: impl Into<String>,
        error_channel: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_flow: source_flow.into(),
            error_channel: error_channel.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn source_flow(&self) -> &str {
        &self.source_flow
    }

    pub fn error_channel(&self) -> &str {
        &self.error_channel
    }

    /// Number of messages enriched so far.
    pub fn enriched(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Return the enriched copy of `message`.
    pub fn enrich<T>(&self, message: Message<T>) -> Message<T> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let message_id = format!("{}-{:x}-{:06x}", self.source_flow, now.as_nanos(), seq);

        message
            .override_header(headers::PROCESSED_AT, processed_at_millis(now))
            .override_header(headers::MESSAGE_ID, message_id)
            .override_header(headers::SOURCE_FLOW, self.source_flow.as_str())
            .override_header(headers::ERROR_CHANNEL, self.error_channel.as_str())
    }
}

/// Milliseconds since the epoch, saturating at `u64::MAX`.
fn processed_at_millis(since_epoch: Duration) -> u64 {
    u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX)
}

impl<T> Stage<T> for Enricher
where
    T: Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Enrich
    }

    fn targets(&self) -> Vec<&str> {
        vec![self.error_channel.as_str()]
    }

    fn process(&self, message: Message<T>, _ctx: &StageContext<'_, T>) -> Outcome<T> {
        Outcome::Continue(self.enrich(message))
    }
}
