//! User configuration: commands with per-category undo, and snapshots of
//! the override state for persistence.

mod command;
mod manager;
mod store;

pub use command::{Command, CommandCategory};
pub use manager::ConfigurationManager;
pub use store::{DisabledModes, RouteKey, Settings, SettingsError, SettingsStore};
