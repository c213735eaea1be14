//! The `TransportMap` facade.
//!
//! Owns the network, the configuration history and the journal, and exposes
//! every query by stop code. Queries read the live override state; nothing is
//! cached between calls.

use tracing::{debug, info};

use crate::analytics::{self, Centrality, RouteCounts, StopCounts};
use crate::journal::Journal;
use crate::network::import::{self, DatasetPaths, ImportError};
use crate::network::{ModeSet, RouteId, StopId, TransportError, TransportNetwork};
use crate::path::{self, PathCriteria, PathResult, Reached, Traversal};
use crate::settings::{
    Command, CommandCategory, ConfigurationManager, Settings, SettingsError, SettingsStore,
};

/// Number of entries returned by [`TransportMap::top5`].
const TOP_CENTRALITY: usize = 5;

/// A transport network with its configuration history and journal.
#[derive(Debug)]
pub struct TransportMap {
    network: TransportNetwork,
    manager: ConfigurationManager,
    journal: Journal,
}

impl TransportMap {
    pub fn new(network: TransportNetwork) -> Self {
        Self {
            network,
            manager: ConfigurationManager::new(),
            journal: Journal::new(),
        }
    }

    /// Loads a network from CSV files.
    pub fn load(paths: &DatasetPaths) -> Result<Self, ImportError> {
        import::load(paths).map(Self::new)
    }

    pub fn network(&self) -> &TransportNetwork {
        &self.network
    }

    pub fn history(&self) -> &ConfigurationManager {
        &self.manager
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn stop(&self, code: &str) -> Result<StopId, TransportError> {
        self.network.stop_id(code)
    }

    /// Stop codes along a path, origin first.
    pub fn stop_codes(&self, result: &PathResult) -> Vec<&str> {
        result
            .stops()
            .filter_map(|id| self.network.stop(id).ok())
            .map(|stop| stop.code().as_str())
            .collect()
    }

    /// Minimum-cost path between two stops.
    ///
    /// The query is journaled, which is why it needs `&mut self`.
    pub fn find_path(
        &mut self,
        criteria: PathCriteria,
        modes: &ModeSet,
        origin: &str,
        destination: &str,
    ) -> Result<PathResult, TransportError> {
        let from = self.stop(origin)?;
        let to = self.stop(destination)?;
        let result = path::find_path(&self.network, criteria, *modes, from, to)?;

        self.journal_path(criteria, origin, destination, &result);
        Ok(result)
    }

    /// Minimum-cost path visiting the waypoints in order.
    pub fn find_path_via(
        &mut self,
        criteria: PathCriteria,
        modes: &ModeSet,
        origin: &str,
        waypoints: &[&str],
        destination: &str,
    ) -> Result<PathResult, TransportError> {
        let from = self.stop(origin)?;
        let via = waypoints
            .iter()
            .map(|code| self.stop(code))
            .collect::<Result<Vec<_>, _>>()?;
        let to = self.stop(destination)?;
        let result = path::find_path_via(&self.network, criteria, *modes, from, &via, to)?;

        if waypoints.is_empty() {
            self.journal_path(criteria, origin, destination, &result);
        } else {
            let label = format!("{origin} via {}", waypoints.join(","));
            self.journal_path(criteria, &label, destination, &result);
        }
        Ok(result)
    }

    fn journal_path(&mut self, criteria: PathCriteria, from: &str, to: &str, result: &PathResult) {
        let message = match result.cost() {
            Some(cost) => format!(
                "path by {criteria} {from} -> {to}: {cost} {}",
                criteria.unit()
            ),
            None => format!("path by {criteria} {from} -> {to}: no path"),
        };
        self.journal.record(message);
    }

    /// Stops within `max_hops` of `origin`. A negative hop count is rejected.
    pub fn reachable_within(
        &self,
        origin: &str,
        max_hops: i64,
    ) -> Result<Vec<Reached>, TransportError> {
        let hops = usize::try_from(max_hops).map_err(|_| {
            TransportError::InvalidArgument(format!(
                "max hops must not be negative (got {max_hops})"
            ))
        })?;
        path::reachable_within(&self.network, self.stop(origin)?, hops)
    }

    pub fn traverse(&self, origin: &str, order: Traversal) -> Result<Vec<StopId>, TransportError> {
        path::traverse(&self.network, self.stop(origin)?, order)
    }

    pub fn centrality(&self) -> Vec<Centrality> {
        analytics::centrality(&self.network)
    }

    pub fn top5(&self) -> Vec<Centrality> {
        analytics::top_centrality(&self.network, TOP_CENTRALITY)
    }

    pub fn stop_counts(&self) -> StopCounts {
        analytics::stop_counts(&self.network)
    }

    pub fn route_counts(&self) -> RouteCounts {
        analytics::route_counts(&self.network)
    }

    /// The route joining two stops, for building commands by code.
    pub fn route_between(&self, a: &str, b: &str) -> Result<RouteId, TransportError> {
        let from = self.stop(a)?;
        let to = self.stop(b)?;
        self.network
            .route_between(from, to)
            .ok_or_else(|| TransportError::UnknownRoute(format!("{a} - {b}")))
    }

    pub fn execute(&mut self, command: Command) -> Result<(), TransportError> {
        self.manager.execute(&mut self.network, command)?;
        self.journal.record(format!("execute: {command}"));
        Ok(())
    }

    /// Undoes the latest command of a category and returns it.
    pub fn undo(&mut self, category: CommandCategory) -> Result<Command, TransportError> {
        let command = self.manager.undo(&mut self.network, category)?;
        self.journal.record(format!("undo: {command}"));
        Ok(command)
    }

    /// Re-enables every route and mode. The duration scale is kept.
    pub fn reset_overrides(&mut self) {
        self.manager.reset(&mut self.network);
        self.journal.record("reset route and mode overrides");
    }

    /// Snapshot of the current override state.
    pub fn settings(&self) -> Result<Settings, TransportError> {
        Settings::capture(&self.network)
    }

    /// Replaces the override state with a snapshot.
    ///
    /// Undo history is dropped: it described changes to the state being
    /// replaced.
    pub fn restore_settings(&mut self, settings: &Settings) -> Result<(), TransportError> {
        settings.apply(&mut self.network)?;
        self.manager.clear();
        self.journal.record("settings restored");
        debug!(
            disabled_routes = settings.disabled_routes.len(),
            duration_scale = settings.duration_scale,
            "settings restored"
        );
        Ok(())
    }

    pub fn save_settings(&self, store: &SettingsStore) -> Result<(), SettingsError> {
        store.save(&self.settings()?)
    }

    /// Restores saved settings if the store has any. Returns whether
    /// anything was restored.
    pub fn load_settings(&mut self, store: &SettingsStore) -> Result<bool, TransportError> {
        match store.load() {
            Some(settings) => {
                self.restore_settings(&settings)?;
                Ok(true)
            }
            None => {
                info!(path = %store.path().display(), "no saved settings, using defaults");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::fixtures::{abc, bike_and_bus};
    use crate::network::TransportMode;
    use tempfile::tempdir;

    fn bus() -> ModeSet {
        ModeSet::from([TransportMode::Bus])
    }

    #[test]
    fn disable_undo_scenario() {
        let mut map = TransportMap::new(abc());

        let result = map.find_path(PathCriteria::Distance, &bus(), "A", "C").unwrap();
        assert_eq!(map.stop_codes(&result), vec!["A", "B", "C"]);
        assert_eq!(result.cost(), Some(8.0));

        let ab = map.route_between("A", "B").unwrap();
        map.execute(Command::DisableRoute(ab)).unwrap();
        let result = map.find_path(PathCriteria::Distance, &bus(), "A", "C").unwrap();
        assert!(!result.is_found());

        map.undo(CommandCategory::Route).unwrap();
        let result = map.find_path(PathCriteria::Distance, &bus(), "A", "C").unwrap();
        assert_eq!(map.stop_codes(&result), vec!["A", "B", "C"]);
        assert_eq!(result.cost(), Some(8.0));
    }

    #[test]
    fn duration_scale_scenario() {
        let mut map = TransportMap::new(bike_and_bus());
        let bikes = ModeSet::from([TransportMode::Bicycle]);

        map.execute(Command::ChangeDurationScale(2.0)).unwrap();
        let result = map.find_path(PathCriteria::Duration, &bikes, "A", "B").unwrap();
        assert_eq!(result.cost(), Some(20.0));

        map.undo(CommandCategory::DurationScale).unwrap();
        let result = map.find_path(PathCriteria::Duration, &bikes, "A", "B").unwrap();
        assert_eq!(result.cost(), Some(10.0));
    }

    #[test]
    fn unknown_codes_and_bad_arguments() {
        let mut map = TransportMap::new(abc());

        assert_eq!(
            map.find_path(PathCriteria::Distance, &bus(), "A", "Z").unwrap_err(),
            TransportError::UnknownStop("Z".into())
        );
        assert_eq!(
            map.find_path(PathCriteria::Distance, &ModeSet::empty(), "A", "C")
                .unwrap_err(),
            TransportError::EmptyModeSet
        );
        assert!(matches!(
            map.reachable_within("A", -1),
            Err(TransportError::InvalidArgument(_))
        ));
        assert_eq!(
            map.route_between("A", "C").unwrap_err(),
            TransportError::UnknownRoute("A - C".into())
        );
        assert_eq!(
            map.undo(CommandCategory::Mode).unwrap_err(),
            TransportError::EmptyHistory(CommandCategory::Mode)
        );
    }

    #[test]
    fn reachability_by_code() {
        let map = TransportMap::new(abc());

        let zero = map.reachable_within("B", 0).unwrap();
        assert_eq!(zero.len(), 1);

        let one = map.reachable_within("A", 1).unwrap();
        assert_eq!(one.len(), 2);
        assert_eq!(one[1].hops, 1);

        let all = map.traverse("C", Traversal::DepthFirst).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn metrics() {
        let mut map = TransportMap::new(abc());

        let top = map.top5();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].degree, 2);
        assert_eq!(map.stop_counts().isolated, 0);
        assert_eq!(map.route_counts().by_mode[&TransportMode::Bus], 2);

        let bc = map.route_between("C", "B").unwrap();
        map.execute(Command::DisableMode(bc, TransportMode::Bus)).unwrap();
        assert_eq!(map.stop_counts().isolated, 1);
        assert_eq!(map.route_counts().total, 1);
        assert_eq!(map.centrality().iter().map(|c| c.degree).sum::<usize>(), 2);
    }

    #[test]
    fn reset_keeps_scale_and_drops_flag_history() {
        let mut map = TransportMap::new(bike_and_bus());
        let ab = map.route_between("A", "B").unwrap();

        map.execute(Command::DisableRoute(ab)).unwrap();
        map.execute(Command::ChangeDurationScale(1.25)).unwrap();
        map.reset_overrides();

        assert!(!map.network().is_route_disabled(ab));
        assert_eq!(map.network().duration_scale(), 1.25);
        assert!(map.undo(CommandCategory::Route).is_err());
        assert!(map.undo(CommandCategory::DurationScale).is_ok());
    }

    #[test]
    fn settings_round_trip_through_store() {
        let dir = tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        let mut map = TransportMap::new(abc());
        assert!(!map.load_settings(&store).unwrap());

        let bc = map.route_between("B", "C").unwrap();
        map.execute(Command::DisableRoute(bc)).unwrap();
        map.execute(Command::ChangeDurationScale(3.0)).unwrap();
        map.save_settings(&store).unwrap();

        let mut fresh = TransportMap::new(abc());
        assert!(fresh.load_settings(&store).unwrap());
        assert_eq!(fresh.network().overrides(), map.network().overrides());
        assert_eq!(fresh.history().history_len(CommandCategory::Route), 0);

        let result = fresh.find_path(PathCriteria::Distance, &bus(), "A", "C").unwrap();
        assert!(!result.is_found());
    }

    #[test]
    fn restore_drops_undo_history() {
        let mut map = TransportMap::new(abc());
        let ab = map.route_between("A", "B").unwrap();
        map.execute(Command::DisableRoute(ab)).unwrap();

        map.restore_settings(&Settings::default()).unwrap();
        assert!(map.network().overrides().is_default());
        assert!(map.undo(CommandCategory::Route).is_err());
    }

    #[test]
    fn journal_records_changes_and_queries() {
        let mut map = TransportMap::new(abc());
        let ab = map.route_between("A", "B").unwrap();

        map.find_path(PathCriteria::Distance, &bus(), "A", "C").unwrap();
        map.execute(Command::DisableRoute(ab)).unwrap();
        map.find_path(PathCriteria::Distance, &bus(), "A", "C").unwrap();
        map.undo(CommandCategory::Route).unwrap();
        map.reset_overrides();
        // Failed operations leave no entry
        let _ = map.undo(CommandCategory::Route);

        let messages: Vec<&str> = map
            .journal()
            .entries()
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "path by distance A -> C: 8 km",
                "execute: disable route 0",
                "path by distance A -> C: no path",
                "undo: disable route 0",
                "reset route and mode overrides",
            ]
        );
    }

    #[test]
    fn bundled_dataset() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let mut map = TransportMap::load(&DatasetPaths::in_dir(dir)).unwrap();
        assert_eq!(map.network().stop_count(), 10);
        assert_eq!(map.network().route_count(), 12);
        assert_eq!(map.stop_counts().isolated, 0);

        let by_boat = map
            .find_path(
                PathCriteria::Duration,
                &ModeSet::from([TransportMode::Boat]),
                "CAC",
                "MOI",
            )
            .unwrap();
        assert_eq!(map.stop_codes(&by_boat), vec!["CAC", "CAI", "MOI"]);
        assert_eq!(by_boat.cost(), Some(40.0));

        let no_boats = map
            .find_path(
                PathCriteria::Duration,
                &ModeSet::from([TransportMode::Bus]),
                "CAC",
                "CAI",
            )
            .unwrap();
        assert_eq!(
            map.stop_codes(&no_boats).first().copied(),
            Some("CAC")
        );
        assert_eq!(map.stop_codes(&no_boats).last().copied(), Some("CAI"));
        assert!(no_boats.hops() > 1);
    }

    #[test]
    fn via_by_code() {
        let mut map = TransportMap::new(abc());
        let result = map
            .find_path_via(PathCriteria::Duration, &bus(), "A", &["C"], "B")
            .unwrap();
        assert_eq!(map.stop_codes(&result), vec!["A", "B", "C", "B"]);
        assert_eq!(result.cost(), Some(22.0));
    }
}
