//! Command-line front end for the transport network engine.
//!
//! Each invocation loads the dataset, restores saved overrides, runs one
//! command and appends what it did to the journal file. Configuration
//! commands save the new override state before exiting.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use transport_map::TransportMap;
use transport_map::config::EngineConfig;
use transport_map::journal::Journal;
use transport_map::network::{ModeSet, TransportMode};
use transport_map::path::{PathCriteria, PathResult, Traversal};
use transport_map::settings::{Command, CommandCategory};

#[derive(Parser)]
#[command(name = "transport-map")]
#[command(about = "Route planning and analytics over a multi-mode transport network")]
struct Cli {
    /// Directory containing stops.csv and routes.csv
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Settings file holding the saved override state
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Journal file to append to
    #[arg(long)]
    journal: Option<PathBuf>,

    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Find the cheapest path between two stops
    Path {
        from: String,
        to: String,
        /// distance, duration or sustainability
        #[arg(long)]
        by: Option<PathCriteria>,
        /// Comma-separated modes, or "all"
        #[arg(long)]
        modes: Option<ModeSet>,
        /// Stops to pass through, in order
        #[arg(long)]
        via: Vec<String>,
        /// Also print the way back
        #[arg(long)]
        round_trip: bool,
    },
    /// List stops within a number of hops
    Reach {
        from: String,
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        hops: i64,
    },
    /// List every stop connected to a stop
    Traverse {
        from: String,
        #[arg(long)]
        depth_first: bool,
    },
    /// Print centrality, isolation and route counts
    Metrics,
    DisableRoute { a: String, b: String },
    EnableRoute { a: String, b: String },
    DisableMode { a: String, b: String, mode: TransportMode },
    EnableMode { a: String, b: String, mode: TransportMode },
    /// Set the bicycle duration scale
    Scale { value: f64 },
    /// Re-enable every route and mode
    Reset,
    /// Print the saved override state as key/value pairs
    Settings,
    /// Print or clear the journal file
    Journal {
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transport_map=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = configure(&cli);

    if let Action::Journal { clear } = cli.command {
        return show_journal(&config, clear);
    }

    let mut map = TransportMap::load(&config.dataset())
        .with_context(|| format!("loading dataset from {}", config.data_dir.display()))?;
    let store = config.settings_store();
    map.load_settings(&store)
        .context("saved settings do not match the dataset")?;

    let changed = run(&mut map, &config, cli.command)?;
    if changed {
        map.save_settings(&store)?;
    }

    map.journal()
        .append_to(&config.journal_path)
        .with_context(|| format!("writing journal {}", config.journal_path.display()))?;
    Ok(())
}

fn configure(cli: &Cli) -> EngineConfig {
    let mut config = EngineConfig::default();
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(path) = &cli.settings {
        config.settings_path = path.clone();
    }
    if let Some(path) = &cli.journal {
        config.journal_path = path.clone();
    }
    config
}

/// Runs one action. Returns true if the override state changed.
fn run(map: &mut TransportMap, config: &EngineConfig, action: Action) -> Result<bool> {
    match action {
        Action::Path {
            from,
            to,
            by,
            modes,
            via,
            round_trip,
        } => {
            let criteria = by.unwrap_or(config.default_criteria);
            let modes = modes.unwrap_or(config.default_modes);
            let waypoints: Vec<&str> = via.iter().map(String::as_str).collect();
            let result = map.find_path_via(criteria, &modes, &from, &waypoints, &to)?;

            print_path(map, &result);
            if round_trip && result.is_found() {
                print_path(map, &result.round_trip());
            }
            Ok(false)
        }
        Action::Reach { from, hops } => {
            for reached in map.reachable_within(&from, hops)? {
                let stop = map.network().stop(reached.stop)?;
                println!("{:>3}  {}  {}", reached.hops, stop.code(), stop.name());
            }
            Ok(false)
        }
        Action::Traverse { from, depth_first } => {
            let order = if depth_first {
                Traversal::DepthFirst
            } else {
                Traversal::BreadthFirst
            };
            for stop in map.traverse(&from, order)? {
                println!("{}", map.network().stop(stop)?.code());
            }
            Ok(false)
        }
        Action::Metrics => {
            println!("Most connected stops:");
            for entry in map.top5() {
                let stop = map.network().stop(entry.stop)?;
                println!("  {:<8} {:>3}  {}", stop.code(), entry.degree, stop.name());
            }
            let stops = map.stop_counts();
            println!(
                "Stops: {} total, {} isolated, {} connected",
                stops.total, stops.isolated, stops.non_isolated
            );
            let routes = map.route_counts();
            println!("Routes: {} enabled", routes.total);
            for (mode, count) in &routes.by_mode {
                println!("  {mode:<8} {count:>3}");
            }
            Ok(false)
        }
        Action::DisableRoute { a, b } => {
            let route = map.route_between(&a, &b)?;
            map.execute(Command::DisableRoute(route))?;
            Ok(true)
        }
        Action::EnableRoute { a, b } => {
            let route = map.route_between(&a, &b)?;
            map.execute(Command::EnableRoute(route))?;
            Ok(true)
        }
        Action::DisableMode { a, b, mode } => {
            let route = map.route_between(&a, &b)?;
            map.execute(Command::DisableMode(route, mode))?;
            Ok(true)
        }
        Action::EnableMode { a, b, mode } => {
            let route = map.route_between(&a, &b)?;
            map.execute(Command::EnableMode(route, mode))?;
            Ok(true)
        }
        Action::Scale { value } => {
            map.execute(Command::ChangeDurationScale(value))?;
            info!(
                history = map.history().history_len(CommandCategory::DurationScale),
                "scale changed"
            );
            Ok(true)
        }
        Action::Reset => {
            map.reset_overrides();
            Ok(true)
        }
        Action::Settings => {
            for (key, value) in map.settings()?.to_pairs()? {
                println!("{key} = {value}");
            }
            Ok(false)
        }
        Action::Journal { .. } => Ok(false),
    }
}

fn print_path(map: &TransportMap, result: &PathResult) {
    let Some(cost) = result.cost() else {
        println!("No path.");
        return;
    };

    let route: Vec<String> = result
        .steps()
        .iter()
        .zip(map.stop_codes(result))
        .map(|(step, code)| match step.mode {
            Some(mode) => format!("-[{mode}]-> {code}"),
            None => code.to_string(),
        })
        .collect();
    println!("{}", route.join(" "));
    println!("{} {}: {cost}", result.criteria(), result.criteria().unit());
}

fn show_journal(config: &EngineConfig, clear: bool) -> Result<()> {
    if clear {
        Journal::clear_file(&config.journal_path)?;
        return Ok(());
    }
    for line in Journal::read_lines(&config.journal_path)? {
        println!("{line}");
    }
    Ok(())
}
