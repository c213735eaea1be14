//! Saving and restoring the override state.
//!
//! Routes are identified by their end stop codes rather than by id, so a
//! snapshot stays meaningful when the dataset is reloaded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::manager::validate_scale;
use crate::network::{
    DEFAULT_DURATION_SCALE, ModeSet, RouteId, StopCode, TransportError, TransportNetwork,
};

const KEY_DURATION_SCALE: &str = "duration_scale";
const KEY_DISABLED_ROUTES: &str = "disabled_routes";
const KEY_DISABLED_MODES: &str = "disabled_modes";

/// Errors from settings persistence.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Settings file could not be written
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Value could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings refer to something the network does not have
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A route named by the codes of its two stops. Order does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteKey {
    pub from: StopCode,
    pub to: StopCode,
}

impl RouteKey {
    fn of(network: &TransportNetwork, route: RouteId) -> Result<Self, TransportError> {
        let route = network.route(route)?;
        Ok(Self {
            from: network.stop(route.from())?.code().clone(),
            to: network.stop(route.to())?.code().clone(),
        })
    }

    fn resolve(&self, network: &TransportNetwork) -> Result<RouteId, TransportError> {
        let from = network.stop_id(self.from.as_str())?;
        let to = network.stop_id(self.to.as_str())?;
        network
            .route_between(from, to)
            .ok_or_else(|| TransportError::UnknownRoute(format!("{} - {}", self.from, self.to)))
    }
}

/// Modes disabled on one route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisabledModes {
    pub route: RouteKey,
    pub modes: ModeSet,
}

/// A snapshot of the override state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub duration_scale: f64,
    #[serde(default)]
    pub disabled_routes: Vec<RouteKey>,
    #[serde(default)]
    pub disabled_modes: Vec<DisabledModes>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            duration_scale: DEFAULT_DURATION_SCALE,
            disabled_routes: Vec::new(),
            disabled_modes: Vec::new(),
        }
    }
}

impl Settings {
    /// Captures the network's current overrides.
    pub fn capture(network: &TransportNetwork) -> Result<Self, TransportError> {
        let overrides = network.overrides();

        let disabled_routes = overrides
            .disabled_routes()
            .map(|route| RouteKey::of(network, route))
            .collect::<Result<Vec<_>, _>>()?;

        let disabled_modes = overrides
            .routes_with_disabled_modes()
            .map(|(route, modes)| {
                Ok(DisabledModes {
                    route: RouteKey::of(network, route)?,
                    modes,
                })
            })
            .collect::<Result<Vec<_>, TransportError>>()?;

        Ok(Self {
            duration_scale: overrides.duration_scale(),
            disabled_routes,
            disabled_modes,
        })
    }

    /// Replaces the network's overrides with this snapshot.
    ///
    /// Every reference is checked before anything is written, so a failure
    /// leaves the network untouched.
    pub fn apply(&self, network: &mut TransportNetwork) -> Result<(), TransportError> {
        let scale = validate_scale(self.duration_scale)?;

        let routes = self
            .disabled_routes
            .iter()
            .map(|key| key.resolve(network))
            .collect::<Result<Vec<_>, _>>()?;

        let mut modes = Vec::new();
        for entry in &self.disabled_modes {
            let route = entry.route.resolve(network)?;
            let supported = network.route(route)?.modes();
            for mode in entry.modes.iter() {
                if !supported.contains(mode) {
                    return Err(TransportError::ModeNotOnRoute { route, mode });
                }
                modes.push((route, mode));
            }
        }

        let overrides = network.overrides_mut();
        overrides.reset_flags();
        for route in routes {
            overrides.set_route_disabled(route, true);
        }
        for (route, mode) in modes {
            overrides.set_mode_disabled(route, mode, true);
        }
        overrides.set_duration_scale(scale);
        Ok(())
    }

    /// Flattens the snapshot into string pairs for an external key/value
    /// store. Values are JSON.
    pub fn to_pairs(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        let mut pairs = BTreeMap::new();
        pairs.insert(
            KEY_DURATION_SCALE.to_string(),
            serde_json::to_string(&self.duration_scale)?,
        );
        pairs.insert(
            KEY_DISABLED_ROUTES.to_string(),
            serde_json::to_string(&self.disabled_routes)?,
        );
        pairs.insert(
            KEY_DISABLED_MODES.to_string(),
            serde_json::to_string(&self.disabled_modes)?,
        );
        Ok(pairs)
    }

    /// Rebuilds a snapshot from [`Settings::to_pairs`] output. Missing keys
    /// take their default; unknown keys are ignored.
    pub fn from_pairs(pairs: &BTreeMap<String, String>) -> Result<Self, SettingsError> {
        let mut settings = Settings::default();
        if let Some(value) = pairs.get(KEY_DURATION_SCALE) {
            settings.duration_scale = serde_json::from_str(value)?;
        }
        if let Some(value) = pairs.get(KEY_DISABLED_ROUTES) {
            settings.disabled_routes = serde_json::from_str(value)?;
        }
        if let Some(value) = pairs.get(KEY_DISABLED_MODES) {
            settings.disabled_modes = serde_json::from_str(value)?;
        }
        Ok(settings)
    }
}

/// A JSON settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the saved settings.
    ///
    /// Returns `None` if the file doesn't exist or can't be parsed, so the
    /// caller can fall back to defaults.
    pub fn load(&self) -> Option<Settings> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable settings file");
                None
            }
        }
    }

    /// Writes settings, creating parent directories if they don't exist.
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json).map_err(|source| self.io_error(source))?;

        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
