use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::debug;

use crate::message::{headers, Message};

use super::{HandlerError, Outcome, Stage, StageContext, StageKind};

/// Dead-letter channel used when a failing message carries no `errorChannel` header.
pub const DEFAULT_DEAD_LETTER_CHANNEL: &str = "dead-letter";

type HandleFn<T> = Box<dyn Fn(&Message<T>) -> Result<(), HandlerError> + Send + Sync>;

/// Terminal handler stage.
///
/// Runs the pipeline's visible effect. When the handler fails or panics, the in-flight
/// message is captured together with the failure (`errorCause`,
/// `failedStage` headers) and forwarded to the channel named by its
/// `errorChannel` header, or to the default dead-letter channel. A message
/// that already carries a captured failure is not redirected a second time;
/// its failure is reported as `Outcome::Fail` instead.
///
/// ## Example
///
/// ```ignore
/// let activator = ServiceActivator::new("odd-handler", |message: &Message<i64>| {
///     println!("Number {}", message.payload());
///     Ok(())
/// });
/// ```
pub struct ServiceActivator<T> {
    name: String,
    handle: HandleFn<T>,
    default_error_channel: String,
}

impl<T> ServiceActivator<T> {
    pub fn new<F>(name: impl Into<String>, handle: F) -> Self
    where
        F: Fn(&Message<T>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handle: Box::new(handle),
            default_error_channel: DEFAULT_DEAD_LETTER_CHANNEL.to_string(),
        }
    }

    /// Set the channel used when a failing message has no `errorChannel` header.
    pub fn with_default_error_channel(mut self, channel: impl Into<String>) -> Self {
        self.default_error_channel = channel.into();
        self
    }

    pub fn default_error_channel(&self) -> &str {
        &self.default_error_channel
    }

    /// Run the handler, reporting a panic as `HandlerError::Panicked`.
    fn invoke(&self, message: &Message<T>) -> Result<(), HandlerError> {
        catch_unwind(AssertUnwindSafe(|| (self.handle)(message)))
            .unwrap_or_else(|panic| Err(HandlerError::from_panic(panic.as_ref())))
    }

    /// Build the dead-letter copy of a message whose handler failed.
    fn capture(&self, message: Message<T>, err: &HandlerError) -> (Message<T>, String) {
        let channel = message
            .header_str(headers::ERROR_CHANNEL)
            .unwrap_or(self.default_error_channel.as_str())
            .to_string();
        let captured = message
            .override_header(headers::ERROR_CAUSE, err.to_string())
            .override_header(headers::FAILED_STAGE, self.name.as_str());
        (captured, channel)
    }
}

impl<T> Stage<T> for ServiceActivator<T>
where
    T: Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Handle
    }

    fn targets(&self) -> Vec<&str> {
        vec![self.default_error_channel.as_str()]
    }

    fn process(&self, message: Message<T>, _ctx: &StageContext<'_, T>) -> Outcome<T> {
        match self.invoke(&message) {
            Ok(()) => Outcome::Drop,
            // A message that already failed once is never redirected again.
            Err(err) if message.has_header(headers::ERROR_CAUSE) => Outcome::Fail(err.to_string()),
            Err(err) => {
                debug!(stage = %self.name, error = %err, "handler failed, capturing for dead-letter");
                let (captured, channel) = self.capture(message, &err);
                Outcome::Forward(captured, channel)
            }
        }
    }
}
