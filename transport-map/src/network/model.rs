//! The network arena: stops, routes, adjacency and override tables.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::overrides::Overrides;
use super::{
    ModeSet, Route, RouteCosts, RouteId, Stop, StopCode, TransportError, TransportMode,
};

/// Index of a stop inside its network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(pub usize);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accumulates stops and routes, then freezes them into a
/// [`TransportNetwork`].
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    by_code: HashMap<StopCode, StopId>,
    by_pair: HashMap<(StopId, StopId), RouteId>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stop. Codes must be unique.
    pub fn add_stop(&mut self, stop: Stop) -> Result<StopId, TransportError> {
        if self.by_code.contains_key(stop.code()) {
            return Err(TransportError::DuplicateStop(stop.code().clone()));
        }
        let id = StopId(self.stops.len());
        self.by_code.insert(stop.code().clone(), id);
        self.stops.push(stop);
        Ok(id)
    }

    /// Adds a route between two existing stops, identified by code.
    ///
    /// Fails if either stop is unknown, both ends are the same stop, the
    /// route supports no mode, or the pair is already joined.
    pub fn add_route(
        &mut self,
        from: &str,
        to: &str,
        costs: RouteCosts,
    ) -> Result<RouteId, TransportError> {
        let from_id = self.stop_id(from)?;
        let to_id = self.stop_id(to)?;

        if from_id == to_id {
            return Err(TransportError::InvalidArgument(format!(
                "route must join two different stops (got {from} twice)"
            )));
        }
        if costs.is_empty() {
            return Err(TransportError::InvalidArgument(format!(
                "route {from} - {to} supports no transport mode"
            )));
        }

        let key = pair_key(from_id, to_id);
        if self.by_pair.contains_key(&key) {
            return Err(TransportError::DuplicateRoute(
                self.stops[from_id.0].code().clone(),
                self.stops[to_id.0].code().clone(),
            ));
        }

        let id = RouteId(self.routes.len());
        self.by_pair.insert(key, id);
        self.routes.push(Route::new(from_id, to_id, costs));
        Ok(id)
    }

    fn stop_id(&self, code: &str) -> Result<StopId, TransportError> {
        StopCode::parse(code)
            .ok()
            .and_then(|code| self.by_code.get(&code).copied())
            .ok_or_else(|| TransportError::UnknownStop(code.to_string()))
    }

    /// Freezes the topology. Every override starts out enabled.
    pub fn build(self) -> TransportNetwork {
        let mut adjacency = vec![Vec::new(); self.stops.len()];
        for (idx, route) in self.routes.iter().enumerate() {
            adjacency[route.from().0].push(RouteId(idx));
            adjacency[route.to().0].push(RouteId(idx));
        }

        debug!(
            stops = self.stops.len(),
            routes = self.routes.len(),
            "network built"
        );

        TransportNetwork {
            overrides: Overrides::new(self.routes.len()),
            stops: self.stops,
            routes: self.routes,
            adjacency,
            by_code: self.by_code,
            by_pair: self.by_pair,
        }
    }
}

fn pair_key(a: StopId, b: StopId) -> (StopId, StopId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// A transport network: an arena of stops and routes addressed by stable
/// integer ids, plus the override state that disables parts of it.
///
/// Topology is fixed after [`NetworkBuilder::build`]. Override state is only
/// changed through the crate's configuration commands.
#[derive(Debug, Clone)]
pub struct TransportNetwork {
    stops: Vec<Stop>,
    routes: Vec<Route>,
    /// Incident routes per stop, in route insertion order.
    adjacency: Vec<Vec<RouteId>>,
    by_code: HashMap<StopCode, StopId>,
    by_pair: HashMap<(StopId, StopId), RouteId>,
    overrides: Overrides,
}

impl TransportNetwork {
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// All stops with their ids, in id order.
    pub fn stops(&self) -> impl Iterator<Item = (StopId, &Stop)> {
        self.stops.iter().enumerate().map(|(idx, s)| (StopId(idx), s))
    }

    /// All routes with their ids, in id order.
    pub fn routes(&self) -> impl Iterator<Item = (RouteId, &Route)> {
        self.routes.iter().enumerate().map(|(idx, r)| (RouteId(idx), r))
    }

    pub fn stop(&self, id: StopId) -> Result<&Stop, TransportError> {
        self.stops.get(id.0).ok_or(TransportError::UnknownStopId(id))
    }

    pub fn route(&self, id: RouteId) -> Result<&Route, TransportError> {
        self.routes.get(id.0).ok_or_else(|| TransportError::route(id))
    }

    /// Looks up a stop by code.
    pub fn stop_id(&self, code: &str) -> Result<StopId, TransportError> {
        StopCode::parse(code)
            .ok()
            .and_then(|code| self.by_code.get(&code).copied())
            .ok_or_else(|| TransportError::UnknownStop(code.to_string()))
    }

    /// The route joining two stops, in either direction.
    pub fn route_between(&self, a: StopId, b: StopId) -> Option<RouteId> {
        self.by_pair.get(&pair_key(a, b)).copied()
    }

    /// All routes touching a stop, enabled or not.
    pub fn incident_routes(&self, stop: StopId) -> &[RouteId] {
        self.adjacency.get(stop.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Routes touching a stop whose route-level flag is enabled.
    ///
    /// Per-mode flags are not applied here; callers filter modes themselves
    /// because different queries allow different modes.
    pub fn enabled_routes_from(&self, stop: StopId) -> impl Iterator<Item = RouteId> + '_ {
        self.incident_routes(stop)
            .iter()
            .copied()
            .filter(|route| !self.overrides.is_route_disabled(*route))
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn is_route_disabled(&self, route: RouteId) -> bool {
        self.overrides.is_route_disabled(route)
    }

    pub fn is_mode_disabled(&self, route: RouteId, mode: TransportMode) -> bool {
        self.overrides.is_mode_disabled(route, mode)
    }

    /// Modes of a route that are not individually disabled.
    pub fn enabled_modes(&self, route: RouteId) -> ModeSet {
        match self.routes.get(route.0) {
            Some(r) => r.modes().difference(self.overrides.disabled_modes(route)),
            None => ModeSet::empty(),
        }
    }

    /// A route is active when its own flag is enabled and at least one of
    /// its modes is enabled. An inactive route behaves as if disabled.
    pub fn is_route_active(&self, route: RouteId) -> bool {
        !self.overrides.is_route_disabled(route) && !self.enabled_modes(route).is_empty()
    }

    /// Number of active routes touching a stop.
    pub fn enabled_degree(&self, stop: StopId) -> usize {
        self.incident_routes(stop)
            .iter()
            .filter(|route| self.is_route_active(**route))
            .count()
    }

    pub fn duration_scale(&self) -> f64 {
        self.overrides.duration_scale()
    }

    pub(crate) fn overrides_mut(&mut self) -> &mut Overrides {
        &mut self.overrides
    }

    /// Fails unless `id` belongs to this network.
    pub(crate) fn check_stop(&self, id: StopId) -> Result<(), TransportError> {
        self.stop(id).map(|_| ())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn duplicate_stop_rejected() {
        let mut builder = NetworkBuilder::new();
        builder.add_stop(stop("A")).unwrap();
        assert!(matches!(
            builder.add_stop(stop("A")),
            Err(TransportError::DuplicateStop(_))
        ));
    }

    #[test]
    fn route_to_missing_stop_is_invalid_reference() {
        let mut builder = NetworkBuilder::new();
        builder.add_stop(stop("A")).unwrap();
        let err = builder
            .add_route("A", "Z", single(TransportMode::Bus, 1.0, 1.0, 1.0))
            .unwrap_err();
        assert_eq!(err, TransportError::UnknownStop("Z".into()));
    }

    #[test]
    fn self_loop_and_modeless_routes_rejected() {
        let mut builder = NetworkBuilder::new();
        builder.add_stop(stop("A")).unwrap();
        builder.add_stop(stop("B")).unwrap();

        assert!(matches!(
            builder.add_route("A", "A", single(TransportMode::Bus, 1.0, 1.0, 1.0)),
            Err(TransportError::InvalidArgument(_))
        ));
        assert!(matches!(
            builder.add_route("A", "B", RouteCosts::new()),
            Err(TransportError::InvalidArgument(_))
        ));
    }

    #[test]
    fn duplicate_pair_rejected_in_either_direction() {
        let mut builder = NetworkBuilder::new();
        builder.add_stop(stop("A")).unwrap();
        builder.add_stop(stop("B")).unwrap();
        builder
            .add_route("A", "B", single(TransportMode::Bus, 1.0, 1.0, 1.0))
            .unwrap();
        assert!(matches!(
            builder.add_route("B", "A", single(TransportMode::Walk, 1.0, 1.0, 1.0)),
            Err(TransportError::DuplicateRoute(_, _))
        ));
    }

    #[test]
    fn lookups() {
        let net = abc();
        let a = net.stop_id("A").unwrap();
        let b = net.stop_id("B").unwrap();
        let c = net.stop_id("C").unwrap();

        assert_eq!(net.stop_count(), 3);
        assert_eq!(net.route_count(), 2);
        assert_eq!(net.stop(a).unwrap().code().as_str(), "A");
        assert_eq!(net.route_between(b, a), Some(RouteId(0)));
        assert_eq!(net.route_between(a, c), None);
        assert!(net.stop_id("Q").is_err());
        assert!(net.stop(StopId(9)).is_err());
        assert!(net.route(RouteId(9)).is_err());
    }

    #[test]
    fn adjacency_skips_disabled_routes_only() {
        let mut net = abc();
        let b = net.stop_id("B").unwrap();

        let all: Vec<_> = net.enabled_routes_from(b).collect();
        assert_eq!(all, vec![RouteId(0), RouteId(1)]);

        net.overrides_mut().set_route_disabled(RouteId(0), true);
        let enabled: Vec<_> = net.enabled_routes_from(b).collect();
        assert_eq!(enabled, vec![RouteId(1)]);

        // Mode flags are left to the caller
        net.overrides_mut()
            .set_mode_disabled(RouteId(1), TransportMode::Bus, true);
        let enabled: Vec<_> = net.enabled_routes_from(b).collect();
        assert_eq!(enabled, vec![RouteId(1)]);
    }

    #[test]
    fn route_without_enabled_modes_is_inactive() {
        let mut net = abc();
        let b = net.stop_id("B").unwrap();

        assert_eq!(net.enabled_degree(b), 2);
        net.overrides_mut()
            .set_mode_disabled(RouteId(1), TransportMode::Bus, true);

        assert!(!net.is_route_disabled(RouteId(1)));
        assert!(!net.is_route_active(RouteId(1)));
        assert!(net.enabled_modes(RouteId(1)).is_empty());
        assert_eq!(net.enabled_degree(b), 1);
    }
}
