use crate::message::Message;

use super::{Outcome, Stage, StageContext, StageKind};

type MapFn<T> = Box<dyn Fn(T) -> T + Send + Sync>;

/// Payload transformer that keeps the payload type and all headers.
pub struct Transformer<T> {
    name: String,
    map: MapFn<T>,
}

impl<T> Transformer<T> {
    pub fn new<F>(name: impl Into<String>, map: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            map: Box::new(map),
        }
    }
}

impl<T> Stage<T> for Transformer<T>
where
    T: Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn process(&self, message: Message<T>, _ctx: &StageContext<'_, T>) -> Outcome<T> {
        Outcome::Continue(message.map_payload(|payload| (self.map)(payload)))
    }
}
