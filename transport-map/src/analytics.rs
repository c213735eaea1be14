//! Degree-based metrics over the active topology.
//!
//! Only active routes count (see [`TransportNetwork::is_route_active`]).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::network::{StopId, TransportMode, TransportNetwork};

/// A stop and the number of active routes touching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Centrality {
    pub stop: StopId,
    pub degree: usize,
}

/// Stop totals split by isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StopCounts {
    pub total: usize,
    pub isolated: usize,
    pub non_isolated: usize,
}

/// Active route totals, overall and per mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCounts {
    pub total: usize,
    /// Every mode appears, with zero when no active route enables it.
    pub by_mode: BTreeMap<TransportMode, usize>,
}

/// Every stop ranked by enabled degree, highest first. Equal degrees are
/// ordered by stop code.
pub fn centrality(network: &TransportNetwork) -> Vec<Centrality> {
    let mut ranked: Vec<(Centrality, &str)> = network
        .stops()
        .map(|(stop, s)| {
            let entry = Centrality {
                stop,
                degree: network.enabled_degree(stop),
            };
            (entry, s.code().as_str())
        })
        .collect();

    ranked.sort_by(|(a, a_code), (b, b_code)| {
        b.degree.cmp(&a.degree).then_with(|| a_code.cmp(b_code))
    });

    ranked.into_iter().map(|(entry, _)| entry).collect()
}

/// The first `n` entries of [`centrality`].
pub fn top_centrality(network: &TransportNetwork, n: usize) -> Vec<Centrality> {
    let mut ranked = centrality(network);
    ranked.truncate(n);
    ranked
}

pub fn stop_counts(network: &TransportNetwork) -> StopCounts {
    let total = network.stop_count();
    let isolated = network
        .stops()
        .filter(|(stop, _)| network.enabled_degree(*stop) == 0)
        .count();

    StopCounts {
        total,
        isolated,
        non_isolated: total - isolated,
    }
}

pub fn route_counts(network: &TransportNetwork) -> RouteCounts {
    let mut by_mode: BTreeMap<TransportMode, usize> =
        TransportMode::ALL.into_iter().map(|mode| (mode, 0)).collect();
    let mut total = 0;

    for (route, _) in network.routes() {
        if !network.is_route_active(route) {
            continue;
        }
        total += 1;
        for mode in network.enabled_modes(route).iter() {
            *by_mode.entry(mode).or_default() += 1;
        }
    }

    RouteCounts { total, by_mode }
}
