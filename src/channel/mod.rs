//! Channels - named delivery primitives and the registry that holds them.
//!
//! ```text
//! ┌──────────┐  send   ┌──────────────────────────────────────────────┐
//! │ Gateway  │ ──────▶ │ Registry                                     │
//! └──────────┘         │  "numbers" (direct, tapped) ─▶ [Router]      │
//!                      │  "even" (pub/sub) ─▶ [Enricher▸Filter▸Handler]│
//!                      │                     [ServiceActivator]       │
//!                      │  "odd" (direct)   ─▶ [Enricher▸Filter▸Handler]│
//!                      │  "discard", "dead-letter", "wire-tap-input"  │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! - **Direct** channels deliver synchronously to their single subscriber
//!   pipeline and return any unredirected failure to the sender.
//! - **PublishSubscribe** channels hand every subscriber its own copy in
//!   registration order (or concurrently, see [`ChannelBuilder::parallel`]);
//!   a failing subscriber never affects the others or the sender.
//!
//! Delivery is immediate and unbounded: `send` returns once every
//! subscriber reachable from the message has finished.

mod channel;
mod dispatcher;
mod error;
mod registry;

pub use channel::{Channel, ChannelBuilder, ChannelKind, Pipeline};
pub use error::ChannelError;
pub use registry::{ChannelRef, Registry, RegistryBuilder};
