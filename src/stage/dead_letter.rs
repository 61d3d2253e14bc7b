use crate::message::{headers, Headers, Message};

use super::{Outcome, Stage, StageContext, StageKind};

/// A message as seen by the dead-letter sink.
///
/// `cause` and `failed_stage` are present when the message was captured by a
/// failing [`ServiceActivator`](super::ServiceActivator); anything else sent
/// straight to the dead-letter channel arrives without them.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadLetter<T> {
    pub payload: T,
    pub headers: Headers,
    pub cause: Option<String>,
    pub failed_stage: Option<String>,
}

impl<T> DeadLetter<T> {
    pub fn from_message(message: Message<T>) -> Self {
        let cause = message.header_str(headers::ERROR_CAUSE).map(str::to_string);
        let failed_stage = message
            .header_str(headers::FAILED_STAGE)
            .map(str::to_string);
        let (payload, headers) = message.into_parts();
        Self {
            payload,
            headers,
            cause,
            failed_stage,
        }
    }

    /// Returns true if this letter carries a captured handler failure.
    pub fn is_failure(&self) -> bool {
        self.cause.is_some()
    }
}

type SinkFn<T> = Box<dyn Fn(DeadLetter<T>) + Send + Sync>;

/// Terminal sink for the dead-letter channel.
///
/// The sink never fails and never redirects. A panic inside the sink closure
/// is caught by the dispatcher like any other stage failure and goes no
/// further.
pub struct DeadLetterSink<T> {
    name: String,
    sink: SinkFn<T>,
}

impl<T> DeadLetterSink<T> {
    pub fn new<F>(name: impl Into<String>, sink: F) -> Self
    where
        F: Fn(DeadLetter<T>) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            sink: Box::new(sink),
        }
    }
}

impl<T> Stage<T> for DeadLetterSink<T>
where
    T: Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::DeadLetter
    }

    fn process(&self, message: Message<T>, _ctx: &StageContext<'_, T>) -> Outcome<T> {
        (self.sink)(DeadLetter::from_message(message));
        Outcome::Drop
    }
}
