//! In-process event notifiers.
//!
//! - [`BroadcastNotifier`]: fan-out to any number of subscribers
//! - [`CompositeNotifier`]: publishes to several sinks in turn

mod broadcast;
mod composite;

pub use broadcast::BroadcastNotifier;
pub use composite::CompositeNotifier;
