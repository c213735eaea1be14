//! Runtime override state layered on top of the static network.

use super::{ModeSet, RouteId, TransportMode};

/// Bicycle duration scale in effect when nothing has been changed.
pub const DEFAULT_DURATION_SCALE: f64 = 1.0;

/// Per-route availability flags and the bicycle duration scale.
///
/// Flags live in tables indexed by [`RouteId`], parallel to the route arena.
/// The scale only affects how bicycle durations are read during a duration
/// search; stored route costs are never rewritten by it.
#[derive(Debug, Clone, PartialEq)]
pub struct Overrides {
    route_disabled: Vec<bool>,
    modes_disabled: Vec<ModeSet>,
    duration_scale: f64,
}

impl Overrides {
    /// All routes and modes enabled, default scale.
    pub(crate) fn new(route_count: usize) -> Self {
        Self {
            route_disabled: vec![false; route_count],
            modes_disabled: vec![ModeSet::empty(); route_count],
            duration_scale: DEFAULT_DURATION_SCALE,
        }
    }

    pub fn is_route_disabled(&self, route: RouteId) -> bool {
        self.route_disabled.get(route.0).copied().unwrap_or(false)
    }

    pub fn disabled_modes(&self, route: RouteId) -> ModeSet {
        self.modes_disabled
            .get(route.0)
            .copied()
            .unwrap_or_default()
    }

    pub fn is_mode_disabled(&self, route: RouteId, mode: TransportMode) -> bool {
        self.disabled_modes(route).contains(mode)
    }

    pub fn duration_scale(&self) -> f64 {
        self.duration_scale
    }

    /// Routes with the route-level flag set, in id order.
    pub fn disabled_routes(&self) -> impl Iterator<Item = RouteId> + '_ {
        self.route_disabled
            .iter()
            .enumerate()
            .filter(|(_, disabled)| **disabled)
            .map(|(idx, _)| RouteId(idx))
    }

    /// Routes with at least one disabled mode, in id order.
    pub fn routes_with_disabled_modes(&self) -> impl Iterator<Item = (RouteId, ModeSet)> + '_ {
        self.modes_disabled
            .iter()
            .enumerate()
            .filter(|(_, modes)| !modes.is_empty())
            .map(|(idx, modes)| (RouteId(idx), *modes))
    }

    /// Returns true if nothing differs from the load-time defaults.
    pub fn is_default(&self) -> bool {
        self.disabled_routes().next().is_none()
            && self.routes_with_disabled_modes().next().is_none()
            && self.duration_scale == DEFAULT_DURATION_SCALE
    }

    /// Sets a route flag and returns its previous value.
    ///
    /// Callers validate `route` first.
    pub(crate) fn set_route_disabled(&mut self, route: RouteId, disabled: bool) -> bool {
        std::mem::replace(&mut self.route_disabled[route.0], disabled)
    }

    /// Sets a (route, mode) flag and returns its previous value.
    pub(crate) fn set_mode_disabled(
        &mut self,
        route: RouteId,
        mode: TransportMode,
        disabled: bool,
    ) -> bool {
        let modes = &mut self.modes_disabled[route.0];
        if disabled {
            !modes.insert(mode)
        } else {
            modes.remove(mode)
        }
    }

    /// Replaces the scale and returns the previous one.
    pub(crate) fn set_duration_scale(&mut self, scale: f64) -> f64 {
        std::mem::replace(&mut self.duration_scale, scale)
    }

    /// Re-enables every route and mode. The scale is left alone.
    pub(crate) fn reset_flags(&mut self) {
        self.route_disabled.fill(false);
        self.modes_disabled.fill(ModeSet::empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_enabled() {
        let overrides = Overrides::new(3);
        assert!(overrides.is_default());
        assert!(!overrides.is_route_disabled(RouteId(0)));
        assert!(!overrides.is_mode_disabled(RouteId(2), TransportMode::Bus));
        assert_eq!(overrides.duration_scale(), 1.0);
    }

    #[test]
    fn setters_return_previous_values() {
        let mut overrides = Overrides::new(2);

        assert!(!overrides.set_route_disabled(RouteId(1), true));
        assert!(overrides.set_route_disabled(RouteId(1), true));
        assert!(overrides.set_route_disabled(RouteId(1), false));

        assert!(!overrides.set_mode_disabled(RouteId(0), TransportMode::Bus, true));
        assert!(overrides.set_mode_disabled(RouteId(0), TransportMode::Bus, true));
        assert!(overrides.set_mode_disabled(RouteId(0), TransportMode::Bus, false));
        assert!(!overrides.set_mode_disabled(RouteId(0), TransportMode::Bus, false));

        assert_eq!(overrides.set_duration_scale(2.0), 1.0);
        assert_eq!(overrides.set_duration_scale(0.5), 2.0);
    }

    #[test]
    fn listing_disabled_entries() {
        let mut overrides = Overrides::new(4);
        overrides.set_route_disabled(RouteId(3), true);
        overrides.set_route_disabled(RouteId(1), true);
        overrides.set_mode_disabled(RouteId(2), TransportMode::Walk, true);

        let routes: Vec<_> = overrides.disabled_routes().collect();
        assert_eq!(routes, vec![RouteId(1), RouteId(3)]);

        let modes: Vec<_> = overrides.routes_with_disabled_modes().collect();
        assert_eq!(modes, vec![(RouteId(2), ModeSet::from([TransportMode::Walk]))]);
    }

    #[test]
    fn reset_keeps_scale() {
        let mut overrides = Overrides::new(2);
        overrides.set_route_disabled(RouteId(0), true);
        overrides.set_mode_disabled(RouteId(1), TransportMode::Train, true);
        overrides.set_duration_scale(1.5);

        overrides.reset_flags();

        assert!(overrides.disabled_routes().next().is_none());
        assert!(overrides.routes_with_disabled_modes().next().is_none());
        assert_eq!(overrides.duration_scale(), 1.5);
        assert!(!overrides.is_default());
    }
}
