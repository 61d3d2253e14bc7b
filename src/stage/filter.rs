use crate::message::Message;

use super::{Outcome, Stage, StageContext, StageKind};

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Message filter with a discard channel.
///
/// Accepted messages continue down the pipeline unchanged. Rejected messages
/// are resent, unmodified, to the discard channel; a filter never destroys a
/// message.
pub struct Filter<T> {
    name: String,
    accept: Predicate<T>,
    discard_channel: String,
}

impl<T> Filter<T> {
    pub fn new<F>(name: impl Into<String>, accept: F, discard_channel: impl Into<String>) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            accept: Box::new(accept),
            discard_channel: discard_channel.into(),
        }
    }

    pub fn accepts(&self, payload: &T) -> bool {
        (self.accept)(payload)
    }

    pub fn discard_channel(&self) -> &str {
        &self.discard_channel
    }
}

impl<T> Stage<T> for Filter<T>
where
    T: Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Filter
    }

    fn targets(&self) -> Vec<&str> {
        vec![self.discard_channel.as_str()]
    }

    fn process(&self, message: Message<T>, _ctx: &StageContext<'_, T>) -> Outcome<T> {
        if self.accepts(message.payload()) {
            Outcome::Continue(message)
        } else {
            Outcome::Forward(message, self.discard_channel.clone())
        }
    }
}
