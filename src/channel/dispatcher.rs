//! Dispatcher - drives delivery from a channel to its subscribers.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;

use tracing::{error, trace, warn};

use super::{Channel, ChannelError, ChannelKind, Pipeline, Registry};
use crate::message::{Message, Payload};
use crate::observe::StageEvent;
use crate::stage::{panic_cause, Outcome, Stage, StageContext};

/// Applies a channel's delivery policy to one message.
pub(crate) struct Dispatcher<'a, T> {
    registry: &'a Registry<T>,
}

impl<'a, T: Payload> Dispatcher<'a, T> {
    pub(crate) fn new(registry: &'a Registry<T>) -> Self {
        Self { registry }
    }

    pub(crate) fn dispatch(
        &self,
        channel: &Channel<T>,
        message: Message<T>,
    ) -> Result<(), ChannelError> {
        trace!(channel = %channel.name(), kind = %channel.kind(), "dispatch");

        if let Some(tap) = channel.wire_tap() {
            self.registry.tap(tap, &message, "wire-tap", channel.name());
        }

        match channel.kind() {
            ChannelKind::Direct => match channel.subscribers().first() {
                Some(pipeline) => self.run(channel, pipeline, message),
                None => Ok(()),
            },
            ChannelKind::PublishSubscribe if channel.is_parallel() => {
                self.fan_out_parallel(channel, message)
            }
            ChannelKind::PublishSubscribe => {
                let mut wiring = None;
                for pipeline in channel.subscribers() {
                    let outcome = self.run(channel, pipeline, message.clone());
                    if let Some(err) = contain(channel, pipeline, outcome) {
                        wiring.get_or_insert(err);
                    }
                }
                wiring.map_or(Ok(()), Err)
            }
        }
    }

    /// Every subscriber on its own scoped thread, each with its own copy.
    fn fan_out_parallel(
        &self,
        channel: &Channel<T>,
        message: Message<T>,
    ) -> Result<(), ChannelError> {
        thread::scope(|scope| {
            let running: Vec<_> = channel
                .subscribers()
                .iter()
                .map(|pipeline| {
                    let copy = message.clone();
                    (pipeline, scope.spawn(move || self.run(channel, pipeline, copy)))
                })
                .collect();

            let mut wiring = None;
            for (pipeline, handle) in running {
                match handle.join() {
                    Ok(outcome) => {
                        if let Some(err) = contain(channel, pipeline, outcome) {
                            wiring.get_or_insert(err);
                        }
                    }
                    Err(panic) => warn!(
                        channel = %channel.name(),
                        subscriber = %pipeline.head(),
                        cause = %panic_cause(panic.as_ref()),
                        "subscriber thread panicked"
                    ),
                }
            }
            wiring.map_or(Ok(()), Err)
        })
    }

    /// Run one subscriber pipeline to its end.
    fn run(
        &self,
        channel: &Channel<T>,
        pipeline: &Pipeline<T>,
        message: Message<T>,
    ) -> Result<(), ChannelError> {
        let ctx = StageContext::new(self.registry, channel.name());
        let observers = self.registry.observers();
        let mut current = message;

        for stage in pipeline.stages() {
            let input = (!observers.is_empty()).then(|| current.clone());
            let outcome = invoke(stage.as_ref(), current, &ctx);

            if let Some(input) = &input {
                observers.notify(&StageEvent::from_outcome(
                    stage.name(),
                    stage.kind(),
                    channel.name(),
                    input,
                    &outcome,
                ));
            }

            match outcome {
                Outcome::Continue(next) => current = next,
                Outcome::Forward(next, target) => {
                    trace!(channel = %channel.name(), stage = %stage.name(), to = %target, "forward");
                    return self.registry.send(&target, next);
                }
                Outcome::Drop => return Ok(()),
                Outcome::Fail(cause) => {
                    return Err(ChannelError::StageFailed {
                        channel: channel.name().to_string(),
                        stage: stage.name().to_string(),
                        cause,
                    })
                }
            }
        }

        // Falling off the end of a pipeline consumes the message.
        Ok(())
    }
}

/// Call a stage, turning a panic into a failure outcome.
fn invoke<T>(stage: &dyn Stage<T>, message: Message<T>, ctx: &StageContext<'_, T>) -> Outcome<T> {
    match catch_unwind(AssertUnwindSafe(|| stage.process(message, ctx))) {
        Ok(outcome) => outcome,
        Err(panic) => Outcome::Fail(format!("stage panicked: {}", panic_cause(panic.as_ref()))),
    }
}

/// Log a publish/subscribe subscriber failure; it never reaches the sender.
///
/// Wiring errors (a forward to an unregistered channel) are handed back
/// instead, so the sender sees them once every subscriber has run.
fn contain<T>(
    channel: &Channel<T>,
    pipeline: &Pipeline<T>,
    outcome: Result<(), ChannelError>,
) -> Option<ChannelError> {
    match outcome {
        Ok(()) => None,
        Err(err) if err.is_configuration() => {
            error!(
                channel = %channel.name(),
                subscriber = %pipeline.head(),
                error = %err,
                "subscriber hit a wiring error"
            );
            Some(err)
        }
        Err(err) => {
            warn!(
                channel = %channel.name(),
                subscriber = %pipeline.head(),
                error = %err,
                "subscriber failed, continuing with remaining subscribers"
            );
            None
        }
    }
}
