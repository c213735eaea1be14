//! Minimum-cost path search.
//!
//! A Dijkstra search over the enabled subgraph. Labels are cost vectors
//! compared lexicographically: the selected criteria first, then its two
//! alternates in declaration order. Floats are compared exactly, with no
//! epsilon. A label only replaces an existing one when it is strictly
//! smaller, and the queue breaks equal labels by push order, so a full tie
//! goes to the path discovered first.
//!
//! Each route is traversed with its cheapest usable mode: supported by the
//! route, allowed by the caller and not disabled on that route. The bicycle
//! duration scale is applied to the primary weight when searching by
//! duration and the chosen mode is the bicycle.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use super::{PathCriteria, PathResult, PathStep};
use crate::network::{
    ModeSet, Route, RouteId, RouteInfo, StopId, TransportError, TransportMode, TransportNetwork,
};

/// Accumulated cost in priority order: primary, first alternate, second
/// alternate.
#[derive(Debug, Clone, Copy)]
struct CostKey([f64; 3]);

impl CostKey {
    const ZERO: CostKey = CostKey([0.0; 3]);

    fn plus(self, other: CostKey) -> CostKey {
        let [a, b, c] = self.0;
        let [x, y, z] = other.0;
        CostKey([a + x, b + y, c + z])
    }
}

impl PartialEq for CostKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CostKey {}

impl PartialOrd for CostKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CostKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.total_cmp(b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// The mode chosen to traverse a route and what it costs.
#[derive(Debug, Clone, Copy)]
struct Edge {
    mode: TransportMode,
    cost: CostKey,
}

/// Predecessor of a stop on its best known path.
#[derive(Debug, Clone, Copy)]
struct Via {
    stop: StopId,
    route: RouteId,
    mode: TransportMode,
}

/// Finds the minimum-cost path between two stops.
///
/// Returns a not-found result when the destination cannot be reached with
/// the allowed modes under the current overrides.
pub fn find_path(
    network: &TransportNetwork,
    criteria: PathCriteria,
    allowed: ModeSet,
    origin: StopId,
    destination: StopId,
) -> Result<PathResult, TransportError> {
    network.check_stop(origin)?;
    network.check_stop(destination)?;
    if allowed.is_empty() {
        return Err(TransportError::EmptyModeSet);
    }
    if origin == destination {
        return Ok(PathResult::single(origin, criteria));
    }

    let stop_count = network.stop_count();
    let mut best: Vec<Option<CostKey>> = vec![None; stop_count];
    let mut via: Vec<Option<Via>> = vec![None; stop_count];
    let mut settled = vec![false; stop_count];
    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;

    best[origin.0] = Some(CostKey::ZERO);
    heap.push(Reverse((CostKey::ZERO, seq, origin)));

    while let Some(Reverse((cost, _, stop))) = heap.pop() {
        if settled[stop.0] {
            continue;
        }
        settled[stop.0] = true;

        trace!(stop = %stop, cost = cost.0[0], "settled");

        if stop == destination {
            break;
        }

        for route_id in network.enabled_routes_from(stop) {
            let route = network.route(route_id)?;
            let Some(next) = route.opposite(stop) else {
                continue;
            };
            if settled[next.0] {
                continue;
            }
            let Some(edge) = cheapest_edge(network, route_id, route, criteria, allowed) else {
                continue;
            };

            let candidate = cost.plus(edge.cost);
            if best[next.0].is_none_or(|current| candidate < current) {
                best[next.0] = Some(candidate);
                via[next.0] = Some(Via {
                    stop,
                    route: route_id,
                    mode: edge.mode,
                });
                seq += 1;
                heap.push(Reverse((candidate, seq, next)));
            }
        }
    }

    let Some(total) = best[destination.0].filter(|_| settled[destination.0]) else {
        debug!(origin = %origin, destination = %destination, criteria = %criteria, "no path");
        return Ok(PathResult::not_found(criteria));
    };

    let steps = reconstruct(&via, origin, destination);
    let totals = totals_of(criteria, total);

    debug!(
        origin = %origin,
        destination = %destination,
        criteria = %criteria,
        hops = steps.len() - 1,
        cost = total.0[0],
        "path found"
    );

    Ok(PathResult::new(steps, criteria, totals))
}

/// Finds the best path that visits each waypoint in order.
///
/// Legs are searched independently and joined. If any leg has no path the
/// whole result is not-found.
pub fn find_path_via(
    network: &TransportNetwork,
    criteria: PathCriteria,
    allowed: ModeSet,
    origin: StopId,
    waypoints: &[StopId],
    destination: StopId,
) -> Result<PathResult, TransportError> {
    network.check_stop(origin)?;
    for waypoint in waypoints {
        network.check_stop(*waypoint)?;
    }
    network.check_stop(destination)?;
    if allowed.is_empty() {
        return Err(TransportError::EmptyModeSet);
    }

    let mut result = PathResult::single(origin, criteria);
    let mut from = origin;
    for to in waypoints.iter().copied().chain(std::iter::once(destination)) {
        let leg = find_path(network, criteria, allowed, from, to)?;
        if !leg.is_found() {
            debug!(from = %from, to = %to, "waypoint leg unreachable");
            return Ok(PathResult::not_found(criteria));
        }
        result = result.then(leg);
        from = to;
    }

    Ok(result)
}

/// Picks the usable mode with the smallest cost vector.
///
/// Modes are tried in declaration order and only a strictly cheaper mode
/// displaces the current choice.
fn cheapest_edge(
    network: &TransportNetwork,
    route_id: RouteId,
    route: &Route,
    criteria: PathCriteria,
    allowed: ModeSet,
) -> Option<Edge> {
    let usable = route
        .modes()
        .intersection(allowed)
        .difference(network.overrides().disabled_modes(route_id));

    usable
        .iter()
        .filter_map(|mode| {
            route.info(mode).map(|info| Edge {
                mode,
                cost: edge_cost(network, criteria, mode, info),
            })
        })
        .min_by(|a, b| a.cost.cmp(&b.cost))
}

fn edge_cost(
    network: &TransportNetwork,
    criteria: PathCriteria,
    mode: TransportMode,
    info: &RouteInfo,
) -> CostKey {
    let mut cost = criteria.priority().map(|c| c.get(info));
    if criteria == PathCriteria::Duration && mode == TransportMode::Bicycle {
        cost[0] *= network.duration_scale();
    }
    CostKey(cost)
}

fn reconstruct(via: &[Option<Via>], origin: StopId, destination: StopId) -> Vec<PathStep> {
    let mut steps = Vec::new();
    let mut current = destination;
    while current != origin {
        let Some(prev) = via[current.0] else {
            break;
        };
        steps.push(PathStep {
            stop: current,
            route: Some(prev.route),
            mode: Some(prev.mode),
        });
        current = prev.stop;
    }
    steps.push(PathStep::start(origin));
    steps.reverse();
    steps
}

fn totals_of(criteria: PathCriteria, cost: CostKey) -> RouteInfo {
    let mut totals = RouteInfo::default();
    for (dimension, value) in criteria.priority().into_iter().zip(cost.0) {
        dimension.put(&mut totals, value);
    }
    totals
}
