use crate::message::Message;

use super::{Outcome, Stage, StageContext, StageKind};

type RouteFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// Content-based router.
///
/// Computes a channel name from the payload and resends the identical message
/// there. The message itself is never touched.
///
/// Every channel the route function can return must be declared with
/// [`Router::with_targets`]; a channel holding a router without targets fails
/// to build, and a declared target that is not registered fails
/// `RegistryBuilder::build`.
///
/// ```ignore
/// let router = Router::new("parity-router", routes::parity("even", "odd"))
///     .with_targets(["even", "odd"]);
/// ```
pub struct Router<T> {
    name: String,
    route: RouteFn<T>,
    targets: Vec<String>,
}

impl<T> Router<T> {
    pub fn new<F>(name: impl Into<String>, route: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            route: Box::new(route),
            targets: Vec::new(),
        }
    }

    /// Declare every channel the route function can return.
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Compute the destination for a payload without sending anything.
    pub fn route(&self, payload: &T) -> String {
        (self.route)(payload)
    }
}

impl<T> Stage<T> for Router<T>
where
    T: Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        StageKind::Route
    }

    fn targets(&self) -> Vec<&str> {
        self.targets.iter().map(String::as_str).collect()
    }

    fn process(&self, message: Message<T>, _ctx: &StageContext<'_, T>) -> Outcome<T> {
        let target = self.route(message.payload());
        Outcome::Forward(message, target)
    }
}
