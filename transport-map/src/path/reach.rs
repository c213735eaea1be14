//! Hop-bounded reachability and full traversals.
//!
//! Both ignore costs and the caller's mode filter. A route counts as long as
//! it is active: enabled itself and with at least one enabled mode.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::network::{StopId, TransportError, TransportNetwork};

/// A stop found by [`reachable_within`] and the hop count it was first
/// reached at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reached {
    pub stop: StopId,
    pub hops: usize,
}

/// Visit order for [`traverse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    #[default]
    BreadthFirst,
    DepthFirst,
}

fn neighbours(network: &TransportNetwork, stop: StopId) -> impl Iterator<Item = StopId> + '_ {
    network
        .enabled_routes_from(stop)
        .filter(move |route| network.is_route_active(*route))
        .filter_map(move |route| network.route(route).ok()?.opposite(stop))
}

/// Every stop within `max_hops` route traversals of `origin`, in discovery
/// order. The origin comes first at hop 0.
pub fn reachable_within(
    network: &TransportNetwork,
    origin: StopId,
    max_hops: usize,
) -> Result<Vec<Reached>, TransportError> {
    network.check_stop(origin)?;

    let mut visited = vec![false; network.stop_count()];
    visited[origin.0] = true;
    let mut reached = vec![Reached {
        stop: origin,
        hops: 0,
    }];

    let mut frontier = vec![origin];
    for hops in 1..=max_hops {
        let mut next_frontier = Vec::new();
        for stop in frontier {
            for next in neighbours(network, stop) {
                if visited[next.0] {
                    continue;
                }
                visited[next.0] = true;
                trace!(stop = %next, hops, "reached");
                reached.push(Reached { stop: next, hops });
                next_frontier.push(next);
            }
        }
        if next_frontier.is_empty() {
            break;
        }
        frontier = next_frontier;
    }

    debug!(origin = %origin, max_hops, reached = reached.len(), "reachability done");
    Ok(reached)
}

/// Every stop connected to `origin`, in visit order.
pub fn traverse(
    network: &TransportNetwork,
    origin: StopId,
    order: Traversal,
) -> Result<Vec<StopId>, TransportError> {
    network.check_stop(origin)?;

    let visits = match order {
        Traversal::BreadthFirst => breadth_first(network, origin),
        Traversal::DepthFirst => depth_first(network, origin),
    };
    Ok(visits)
}

fn breadth_first(network: &TransportNetwork, origin: StopId) -> Vec<StopId> {
    let mut visited = vec![false; network.stop_count()];
    let mut order = Vec::new();
    let mut queue = VecDeque::from([origin]);
    visited[origin.0] = true;

    while let Some(stop) = queue.pop_front() {
        order.push(stop);
        for next in neighbours(network, stop) {
            if !visited[next.0] {
                visited[next.0] = true;
                queue.push_back(next);
            }
        }
    }
    order
}

/// Pre-order depth-first walk; neighbours are explored in adjacency order.
fn depth_first(network: &TransportNetwork, origin: StopId) -> Vec<StopId> {
    let mut visited = vec![false; network.stop_count()];
    let mut order = Vec::new();
    let mut stack = vec![origin];

    while let Some(stop) = stack.pop() {
        if visited[stop.0] {
            continue;
        }
        visited[stop.0] = true;
        order.push(stop);

        let mut next: Vec<StopId> = neighbours(network, stop)
            .filter(|n| !visited[n.0])
            .collect();
        next.reverse();
        stack.extend(next);
    }
    order
}
