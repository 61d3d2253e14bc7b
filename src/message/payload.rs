use std::fmt::Debug;

use serde::Serialize;

/// Bound shared by every payload type a channel can carry.
///
/// Payloads are cloned once per publish/subscribe subscriber, crossed between
/// producer threads, and rendered into observer events.
pub trait Payload: Clone + Debug + Serialize + Send + Sync + 'static {}

impl<T> Payload for T where T: Clone + Debug + Serialize + Send + Sync + 'static {}
