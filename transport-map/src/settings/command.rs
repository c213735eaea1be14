//! Configuration commands and their undo categories.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::network::{RouteId, TransportMode};

/// The undo stack a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandCategory {
    Route,
    Mode,
    DurationScale,
}

impl CommandCategory {
    pub const ALL: [CommandCategory; 3] = [
        CommandCategory::Route,
        CommandCategory::Mode,
        CommandCategory::DurationScale,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommandCategory::Route => "route",
            CommandCategory::Mode => "mode",
            CommandCategory::DurationScale => "duration scale",
        })
    }
}

/// A change to the override state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    DisableRoute(RouteId),
    EnableRoute(RouteId),
    DisableMode(RouteId, TransportMode),
    EnableMode(RouteId, TransportMode),
    /// Replace the bicycle duration scale.
    ChangeDurationScale(f64),
}

impl Command {
    pub fn category(&self) -> CommandCategory {
        match self {
            Command::DisableRoute(_) | Command::EnableRoute(_) => CommandCategory::Route,
            Command::DisableMode(..) | Command::EnableMode(..) => CommandCategory::Mode,
            Command::ChangeDurationScale(_) => CommandCategory::DurationScale,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::DisableRoute(route) => write!(f, "disable route {route}"),
            Command::EnableRoute(route) => write!(f, "enable route {route}"),
            Command::DisableMode(route, mode) => write!(f, "disable {mode} on route {route}"),
            Command::EnableMode(route, mode) => write!(f, "enable {mode} on route {route}"),
            Command::ChangeDurationScale(scale) => write!(f, "set duration scale to {scale}"),
        }
    }
}
