//! Service contains the business logic of the application.

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod event;
pub mod infra;
pub mod query;
pub mod read;

use smart_default::SmartDefault;
use tokio::sync::broadcast;

pub use self::{command::Command, event::Event, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Capacity of the [`Event`] broadcast channel.
    ///
    /// Once exceeded, the oldest unconsumed [`Event`]s are dropped for
    /// lagging subscribers.
    #[default(256)]
    pub event_capacity: usize,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<S> {
    /// Configuration of this [`Service`].
    config: Config,

    /// Storage of this [`Service`].
    storage: S,

    /// Sender of [`Event`]s emitted by this [`Service`].
    events: broadcast::Sender<Event>,
}

impl<S> Service<S> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, storage: S) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            config,
            storage,
            events,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns storage of this [`Service`].
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Subscribes to [`Event`]s emitted by this [`Service`].
    ///
    /// Every subscriber receives every [`Event`] emitted after the moment of
    /// subscription, unless it lags behind the channel capacity.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Emits the provided [`Event`] to all the current subscribers.
    ///
    /// Fire-and-forget: never blocks, and an absence of subscribers is not
    /// an error.
    pub(crate) fn emit(&self, event: Event) {
        _ = self.events.send(event);
    }
}
