//! Routes and their per-mode costs.

use std::fmt;

use super::mode::MODE_COUNT;
use super::{ModeSet, StopId, TransportError, TransportMode};
use crate::path::PathCriteria;

/// Index of a route inside its network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub usize);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three cost dimensions of travelling a route with one mode.
///
/// Route costs are finite and non-negative, enforced by
/// [`PathCriteria::set`]. Path totals are sums of route costs and may be
/// infinite when the sum overflows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteInfo {
    pub(crate) distance: f64,
    pub(crate) duration: f64,
    pub(crate) sustainability: f64,
}

impl RouteInfo {
    /// Creates route info, validating every dimension.
    pub fn new(distance: f64, duration: f64, sustainability: f64) -> Result<Self, TransportError> {
        let mut info = RouteInfo::default();
        PathCriteria::Distance.set(&mut info, distance)?;
        PathCriteria::Duration.set(&mut info, duration)?;
        PathCriteria::Sustainability.set(&mut info, sustainability)?;
        Ok(info)
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn sustainability(&self) -> f64 {
        self.sustainability
    }
}

/// Costs of a route for each mode it supports.
///
/// The route's mode set is exactly the set of modes with info.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteCosts {
    infos: [Option<RouteInfo>; MODE_COUNT],
}

impl RouteCosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the info for one mode.
    pub fn with(mut self, mode: TransportMode, info: RouteInfo) -> Self {
        self.infos[mode as usize] = Some(info);
        self
    }

    /// The same info for every mode in `modes`.
    pub fn uniform(info: RouteInfo, modes: ModeSet) -> Self {
        modes
            .iter()
            .fold(RouteCosts::new(), |costs, mode| costs.with(mode, info))
    }

    pub fn modes(&self) -> ModeSet {
        TransportMode::ALL
            .into_iter()
            .filter(|mode| self.infos[*mode as usize].is_some())
            .collect()
    }

    pub fn info(&self, mode: TransportMode) -> Option<&RouteInfo> {
        self.infos[mode as usize].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.iter().all(Option::is_none)
    }
}

/// A route joining two distinct stops, traversable in both directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    from: StopId,
    to: StopId,
    costs: RouteCosts,
}

impl Route {
    pub(crate) fn new(from: StopId, to: StopId, costs: RouteCosts) -> Self {
        Self { from, to, costs }
    }

    /// The stop the route was declared from.
    pub fn from(&self) -> StopId {
        self.from
    }

    /// The stop the route was declared to.
    pub fn to(&self) -> StopId {
        self.to
    }

    /// Returns the other end of the route, or `None` if `stop` is not an end.
    pub fn opposite(&self, stop: StopId) -> Option<StopId> {
        if stop == self.from {
            Some(self.to)
        } else if stop == self.to {
            Some(self.from)
        } else {
            None
        }
    }

    pub fn modes(&self) -> ModeSet {
        self.costs.modes()
    }

    pub fn supports(&self, mode: TransportMode) -> bool {
        self.costs.info(mode).is_some()
    }

    pub fn info(&self, mode: TransportMode) -> Option<&RouteInfo> {
        self.costs.info(mode)
    }

    pub fn costs(&self) -> &RouteCosts {
        &self.costs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_info_rejects_negative_and_nan() {
        assert!(RouteInfo::new(1.0, 2.0, 3.0).is_ok());
        assert!(RouteInfo::new(0.0, 0.0, 0.0).is_ok());
        assert!(matches!(
            RouteInfo::new(-1.0, 2.0, 3.0),
            Err(TransportError::InvalidValue { what: "distance", .. })
        ));
        assert!(matches!(
            RouteInfo::new(1.0, f64::NAN, 3.0),
            Err(TransportError::InvalidValue { what: "duration", .. })
        ));
        assert!(matches!(
            RouteInfo::new(1.0, 2.0, -0.5),
            Err(TransportError::InvalidValue { what: "sustainability", .. })
        ));
    }

    #[test]
    fn costs_track_modes() {
        let info = RouteInfo::new(5.0, 10.0, 1.0).unwrap();
        let costs = RouteCosts::new()
            .with(TransportMode::Bicycle, info)
            .with(TransportMode::Bus, info);

        assert_eq!(
            costs.modes(),
            ModeSet::from([TransportMode::Bus, TransportMode::Bicycle])
        );
        assert!(costs.info(TransportMode::Train).is_none());
        assert!(!costs.is_empty());
        assert!(RouteCosts::new().is_empty());
    }

    #[test]
    fn uniform_costs() {
        let info = RouteInfo::new(5.0, 10.0, 1.0).unwrap();
        let modes = ModeSet::from([TransportMode::Bus, TransportMode::Train]);
        let costs = RouteCosts::uniform(info, modes);

        assert_eq!(costs.modes(), modes);
        assert_eq!(costs.info(TransportMode::Bus), Some(&info));
        assert_eq!(costs.info(TransportMode::Train), Some(&info));
    }

    #[test]
    fn opposite_end() {
        let info = RouteInfo::new(1.0, 1.0, 1.0).unwrap();
        let route = Route::new(
            StopId(0),
            StopId(1),
            RouteCosts::new().with(TransportMode::Walk, info),
        );

        assert_eq!(route.opposite(StopId(0)), Some(StopId(1)));
        assert_eq!(route.opposite(StopId(1)), Some(StopId(0)));
        assert_eq!(route.opposite(StopId(2)), None);
        assert!(route.supports(TransportMode::Walk));
        assert!(!route.supports(TransportMode::Bus));
    }
}
