//! Path search results.

use super::PathCriteria;
use crate::network::{RouteId, RouteInfo, StopId, TransportMode};

/// One stop on a path and how it was reached.
///
/// The first step of a path has no incoming route or mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub stop: StopId,
    pub route: Option<RouteId>,
    pub mode: Option<TransportMode>,
}

impl PathStep {
    pub fn start(stop: StopId) -> Self {
        Self {
            stop,
            route: None,
            mode: None,
        }
    }
}

/// The outcome of a path search.
///
/// An empty step list means no path exists under the current overrides and
/// mode filter. That is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    steps: Vec<PathStep>,
    criteria: PathCriteria,
    /// Accumulated cost in every dimension along the chosen edges.
    totals: RouteInfo,
}

impl PathResult {
    pub(crate) fn new(steps: Vec<PathStep>, criteria: PathCriteria, totals: RouteInfo) -> Self {
        Self {
            steps,
            criteria,
            totals,
        }
    }

    /// A result with no path.
    pub fn not_found(criteria: PathCriteria) -> Self {
        Self::new(Vec::new(), criteria, RouteInfo::default())
    }

    /// The zero-length path from a stop to itself.
    pub fn single(stop: StopId, criteria: PathCriteria) -> Self {
        Self::new(vec![PathStep::start(stop)], criteria, RouteInfo::default())
    }

    pub fn is_found(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Stops from origin to destination inclusive.
    pub fn stops(&self) -> impl Iterator<Item = StopId> + '_ {
        self.steps.iter().map(|step| step.stop)
    }

    /// Number of routes travelled.
    pub fn hops(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn criteria(&self) -> PathCriteria {
        self.criteria
    }

    /// Total cost under the criteria the search minimised.
    pub fn cost(&self) -> Option<f64> {
        self.totals().map(|totals| self.criteria.get(totals))
    }

    /// Totals for all three dimensions, if a path was found.
    pub fn totals(&self) -> Option<&RouteInfo> {
        self.is_found().then_some(&self.totals)
    }

    /// The same path travelled from destination back to origin.
    ///
    /// Routes are undirected, so the totals carry over unchanged.
    pub fn round_trip(&self) -> PathResult {
        let mut steps = Vec::with_capacity(self.steps.len());
        let mut incoming = (None, None);
        for step in self.steps.iter().rev() {
            steps.push(PathStep {
                stop: step.stop,
                route: incoming.0,
                mode: incoming.1,
            });
            incoming = (step.route, step.mode);
        }
        PathResult::new(steps, self.criteria, self.totals)
    }

    /// Appends a path that starts where this one ends.
    ///
    /// If either part is missing the joined result is missing too.
    pub(crate) fn then(self, next: PathResult) -> PathResult {
        if !self.is_found() || !next.is_found() {
            return PathResult::not_found(self.criteria);
        }

        let mut totals = self.totals;
        for criteria in PathCriteria::ALL {
            criteria.put(
                &mut totals,
                criteria.get(&self.totals) + criteria.get(&next.totals),
            );
        }

        let mut steps = self.steps;
        steps.extend(next.steps.into_iter().skip(1));
        PathResult::new(steps, self.criteria, totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(stop: usize, route: Option<usize>, mode: Option<TransportMode>) -> PathStep {
        PathStep {
            stop: StopId(stop),
            route: route.map(RouteId),
            mode,
        }
    }

    fn sample() -> PathResult {
        PathResult::new(
            vec![
                step(0, None, None),
                step(1, Some(0), Some(TransportMode::Bus)),
                step(2, Some(1), Some(TransportMode::Walk)),
            ],
            PathCriteria::Distance,
            RouteInfo::new(8.0, 16.0, 2.0).unwrap(),
        )
    }

    #[test]
    fn not_found_has_no_cost() {
        let result = PathResult::not_found(PathCriteria::Duration);
        assert!(!result.is_found());
        assert_eq!(result.cost(), None);
        assert_eq!(result.totals(), None);
        assert_eq!(result.hops(), 0);
    }

    #[test]
    fn single_stop_costs_nothing() {
        let result = PathResult::single(StopId(4), PathCriteria::Distance);
        assert!(result.is_found());
        assert_eq!(result.cost(), Some(0.0));
        assert_eq!(result.stops().collect::<Vec<_>>(), vec![StopId(4)]);
    }

    #[test]
    fn cost_follows_criteria() {
        let result = sample();
        assert_eq!(result.cost(), Some(8.0));
        assert_eq!(result.totals().unwrap().duration(), 16.0);
        assert_eq!(result.hops(), 2);
    }

    #[test]
    fn round_trip_reattaches_incoming_routes() {
        let back = sample().round_trip();
        assert_eq!(
            back.steps(),
            &[
                step(2, None, None),
                step(1, Some(1), Some(TransportMode::Walk)),
                step(0, Some(0), Some(TransportMode::Bus)),
            ]
        );
        assert_eq!(back.cost(), Some(8.0));
        assert_eq!(back.round_trip(), sample());
    }

    #[test]
    fn joining_paths() {
        let first = sample();
        let second = PathResult::new(
            vec![step(2, None, None), step(3, Some(2), Some(TransportMode::Train))],
            PathCriteria::Distance,
            RouteInfo::new(1.0, 2.0, 0.5).unwrap(),
        );

        let joined = first.clone().then(second);
        assert_eq!(
            joined.stops().collect::<Vec<_>>(),
            vec![StopId(0), StopId(1), StopId(2), StopId(3)]
        );
        assert_eq!(joined.cost(), Some(9.0));
        assert_eq!(joined.totals().unwrap().sustainability(), 2.5);

        let missing = first.then(PathResult::not_found(PathCriteria::Distance));
        assert!(!missing.is_found());
    }
}
