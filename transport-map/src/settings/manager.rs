//! Command execution with one undo stack per category.

use tracing::{debug, info};

use super::{Command, CommandCategory};
use crate::network::{RouteId, TransportError, TransportMode, TransportNetwork};

/// Checks a duration scale: finite and strictly positive.
pub(crate) fn validate_scale(scale: f64) -> Result<f64, TransportError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(TransportError::InvalidValue {
            what: "duration scale",
            value: scale,
        })
    }
}

/// What a command overwrote, so undo can put it back.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Restore {
    RouteDisabled(RouteId, bool),
    ModeDisabled(RouteId, TransportMode, bool),
    Scale(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Applied {
    command: Command,
    restore: Restore,
}

/// Applies commands to a network and undoes them per category.
///
/// Undo pops the most recent command of one category and restores the exact
/// value it replaced. Categories touch disjoint parts of the override state,
/// so undoing one never disturbs another.
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    stacks: [Vec<Applied>; 3],
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and applies a command, then records it.
    ///
    /// On error nothing changes.
    pub fn execute(
        &mut self,
        network: &mut TransportNetwork,
        command: Command,
    ) -> Result<(), TransportError> {
        let restore = match command {
            Command::DisableRoute(route) | Command::EnableRoute(route) => {
                network.route(route)?;
                let disabled = matches!(command, Command::DisableRoute(_));
                let was = network.overrides_mut().set_route_disabled(route, disabled);
                Restore::RouteDisabled(route, was)
            }
            Command::DisableMode(route, mode) | Command::EnableMode(route, mode) => {
                check_mode(network, route, mode)?;
                let disabled = matches!(command, Command::DisableMode(..));
                let was = network
                    .overrides_mut()
                    .set_mode_disabled(route, mode, disabled);
                Restore::ModeDisabled(route, mode, was)
            }
            Command::ChangeDurationScale(scale) => {
                let scale = validate_scale(scale)?;
                Restore::Scale(network.overrides_mut().set_duration_scale(scale))
            }
        };

        debug!(command = %command, "executed");
        self.stacks[command.category().index()].push(Applied { command, restore });
        Ok(())
    }

    /// Reverses the most recent command of `category` and returns it.
    pub fn undo(
        &mut self,
        network: &mut TransportNetwork,
        category: CommandCategory,
    ) -> Result<Command, TransportError> {
        let applied = self.stacks[category.index()]
            .pop()
            .ok_or(TransportError::EmptyHistory(category))?;

        let overrides = network.overrides_mut();
        match applied.restore {
            Restore::RouteDisabled(route, was) => {
                overrides.set_route_disabled(route, was);
            }
            Restore::ModeDisabled(route, mode, was) => {
                overrides.set_mode_disabled(route, mode, was);
            }
            Restore::Scale(was) => {
                overrides.set_duration_scale(was);
            }
        }

        debug!(command = %applied.command, "undone");
        Ok(applied.command)
    }

    /// Re-enables every route and mode, leaving the duration scale alone.
    ///
    /// Route and mode history is dropped so a later undo cannot bring back
    /// an override from before the reset. Duration scale history is kept.
    pub fn reset(&mut self, network: &mut TransportNetwork) {
        network.overrides_mut().reset_flags();
        self.stacks[CommandCategory::Route.index()].clear();
        self.stacks[CommandCategory::Mode.index()].clear();
        info!("route and mode overrides reset");
    }

    /// Forgets all history.
    pub fn clear(&mut self) {
        for stack in &mut self.stacks {
            stack.clear();
        }
    }

    /// The command the next undo of `category` would reverse.
    pub fn peek(&self, category: CommandCategory) -> Option<&Command> {
        self.stacks[category.index()]
            .last()
            .map(|applied| &applied.command)
    }

    pub fn history_len(&self, category: CommandCategory) -> usize {
        self.stacks[category.index()].len()
    }
}

fn check_mode(
    network: &TransportNetwork,
    route: RouteId,
    mode: TransportMode,
) -> Result<(), TransportError> {
    if network.route(route)?.supports(mode) {
        Ok(())
    } else {
        Err(TransportError::ModeNotOnRoute { route, mode })
    }
}
