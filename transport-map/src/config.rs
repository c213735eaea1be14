//! Engine configuration.

use std::path::PathBuf;

use crate::network::ModeSet;
use crate::network::import::DatasetPaths;
use crate::path::PathCriteria;
use crate::settings::SettingsStore;

/// Where the engine reads and writes its files, and query defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding `stops.csv` and `routes.csv`.
    pub data_dir: PathBuf,

    /// JSON file the override state is saved to.
    pub settings_path: PathBuf,

    /// Journal file entries are appended to.
    pub journal_path: PathBuf,

    /// Modes a path query may use unless told otherwise.
    pub default_modes: ModeSet,

    /// Criteria a path query minimises unless told otherwise.
    pub default_criteria: PathCriteria,
}

impl EngineConfig {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        settings_path: impl Into<PathBuf>,
        journal_path: impl Into<PathBuf>,
        default_modes: ModeSet,
        default_criteria: PathCriteria,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            settings_path: settings_path.into(),
            journal_path: journal_path.into(),
            default_modes,
            default_criteria,
        }
    }

    pub fn dataset(&self) -> DatasetPaths {
        DatasetPaths::in_dir(&self.data_dir)
    }

    pub fn settings_store(&self) -> SettingsStore {
        SettingsStore::new(&self.settings_path)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            settings_path: PathBuf::from("settings.json"),
            journal_path: PathBuf::from("journal.log"),
            default_modes: ModeSet::all(),
            default_criteria: PathCriteria::Distance,
        }
    }
}
