use crate::message::{Message, Payload};

use super::{Outcome, Stage, StageContext, StageKind};

/// Wire tap stage.
///
/// Sends a copy of every passing message to the tap channel and lets the
/// original continue unchanged. Failures on the tap side are logged and
/// reported to observers, never returned to the primary pipeline.
pub struct WireTap {
    name: String,
    tap_channel: String,
}

impl WireTap {
    pub fn new(name: impl Into<String>, tap_channel: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tap_channel: tap_channel.into(),
        }
    }

    pub fn tap_channel(&self) -> &str {
        &self.tap_channel
    }
}

impl<T: Payload> Stage<T> for WireTap {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Tap
    }

    fn targets(&self) -> Vec<&str> {
        vec![self.tap_channel.as_str()]
    }

    fn process(&self, message: Message<T>, ctx: &StageContext<'_, T>) -> Outcome<T> {
        ctx.registry()
            .tap(&self.tap_channel, &message, &self.name, ctx.channel());
        Outcome::Continue(message)
    }
}
