//! Errors raised by the network model and everything that queries or
//! mutates it.
//!
//! All of these are recoverable: an operation that fails leaves the network,
//! its overrides and the undo history exactly as they were.

use super::{RouteId, StopCode, StopId, TransportMode};
use crate::settings::CommandCategory;

/// Errors from network construction, queries and configuration commands.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// No stop with this code exists
    #[error("unknown stop: {0}")]
    UnknownStop(String),

    /// Stop id does not belong to this network
    #[error("unknown stop id: {0}")]
    UnknownStopId(StopId),

    /// Route id does not belong to this network, or no route joins two stops
    #[error("unknown route: {0}")]
    UnknownRoute(String),

    /// A stop with this code was already added
    #[error("duplicate stop: {0}")]
    DuplicateStop(StopCode),

    /// Two stops are already joined by a route
    #[error("stops {0} and {1} are already joined by a route")]
    DuplicateRoute(StopCode, StopCode),

    /// Malformed input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No transport mode was allowed for a path query
    #[error("invalid argument: at least one transport mode must be allowed")]
    EmptyModeSet,

    /// The route does not support the given mode
    #[error("invalid argument: route {route} does not support {mode}")]
    ModeNotOnRoute { route: RouteId, mode: TransportMode },

    /// A cost or scale is out of range
    #[error("invalid value for {what}: {value}")]
    InvalidValue { what: &'static str, value: f64 },

    /// Path criteria name outside the supported set
    #[error("unsupported path criteria: {0}")]
    UnsupportedCriteria(String),

    /// Undo requested with nothing to undo
    #[error("no {0} changes to undo")]
    EmptyHistory(CommandCategory),
}

impl TransportError {
    pub(crate) fn route(id: RouteId) -> Self {
        TransportError::UnknownRoute(format!("#{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TransportError::UnknownStop("XYZ".into());
        assert_eq!(err.to_string(), "unknown stop: XYZ");

        let err = TransportError::UnknownStopId(StopId(7));
        assert_eq!(err.to_string(), "unknown stop id: 7");

        let err = TransportError::route(RouteId(3));
        assert_eq!(err.to_string(), "unknown route: #3");

        let err = TransportError::EmptyModeSet;
        assert_eq!(
            err.to_string(),
            "invalid argument: at least one transport mode must be allowed"
        );

        let err = TransportError::ModeNotOnRoute {
            route: RouteId(2),
            mode: TransportMode::Boat,
        };
        assert_eq!(
            err.to_string(),
            "invalid argument: route 2 does not support boat"
        );

        let err = TransportError::InvalidValue {
            what: "duration scale",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "invalid value for duration scale: -1");

        let err = TransportError::UnsupportedCriteria("cheapest".into());
        assert_eq!(err.to_string(), "unsupported path criteria: cheapest");

        let err = TransportError::EmptyHistory(CommandCategory::Route);
        assert_eq!(err.to_string(), "no route changes to undo");

        let a = StopCode::parse("A").unwrap();
        let b = StopCode::parse("B").unwrap();
        let err = TransportError::DuplicateRoute(a, b);
        assert_eq!(err.to_string(), "stops A and B are already joined by a route");
    }
}
