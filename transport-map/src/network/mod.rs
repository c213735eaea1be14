//! Network model: stops, routes and the override state layered on them.
//!
//! Stops and routes live in an arena addressed by [`StopId`] and [`RouteId`].
//! The topology is fixed once built; what changes at runtime is the override
//! state (disabled routes, disabled modes per route, the bicycle duration
//! scale), kept in tables parallel to the route arena.

mod error;
pub mod import;
mod mode;
mod model;
mod overrides;
mod route;
mod stop;

pub use error::TransportError;
pub use mode::{ModeSet, TransportMode, UnknownMode};
pub use model::{NetworkBuilder, StopId, TransportNetwork};
pub use overrides::{DEFAULT_DURATION_SCALE, Overrides};
pub use route::{Route, RouteCosts, RouteId, RouteInfo};
pub use stop::{Coordinate, InvalidStopCode, Stop, StopCode};

#[cfg(test)]
pub(crate) use model::fixtures;
