//! Domain traits - Abstractions for infrastructure implementations

pub mod store;
pub mod geo;

pub use store::{DocumentStore, SessionStore};
pub use geo::{DeviceLocator, IpLocation, IpLocator, Position, PositionOptions};
