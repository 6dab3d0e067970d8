//! Event fabric for crease.
//!
//! Every committed scoring change is published as a [`ScoreEvent`] and fanned
//! out to subscribers whose [`EventFilter`] matches. Delivery happens after
//! the store transaction commits, so subscribers never see a change that was
//! rolled back. Subscribers receive a `tokio` broadcast receiver and may
//! consume it from async or blocking code.

pub mod error;
pub mod event;
pub mod fabric;

pub use error::FabricError;
pub use event::{EventKind, EventPayload, ScoreEvent};
pub use fabric::{EventFabric, EventFilter, EventStream, FabricConfig};
