//! Dataset import from CSV files.
//!
//! Two files describe a network:
//!
//! - `stops.csv`: `code,name,latitude,longitude`
//! - `routes.csv`: `from,to`, then five distance columns, five duration
//!   columns and five sustainability columns, each group in
//!   [`TransportMode::ALL`] order. An empty distance cell means the route
//!   does not support that mode.
//!
//! Both files start with a header row.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::mode::MODE_COUNT;
use super::{
    Coordinate, NetworkBuilder, RouteCosts, RouteInfo, Stop, StopCode, TransportError,
    TransportMode, TransportNetwork,
};

/// Index of the first cost column in `routes.csv`.
const FIRST_COST_COLUMN: usize = 2;

/// Errors from reading a dataset.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// File could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row could not be interpreted
    #[error("{file} line {line}: {message}")]
    Row {
        file: &'static str,
        line: u64,
        message: String,
    },

    /// The row was well formed but broke a network invariant
    #[error("{file} line {line}: {source}")]
    Network {
        file: &'static str,
        line: u64,
        #[source]
        source: TransportError,
    },
}

/// Where to find the dataset files.
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub stops: PathBuf,
    pub routes: PathBuf,
}

impl DatasetPaths {
    /// `stops.csv` and `routes.csv` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            stops: dir.join("stops.csv"),
            routes: dir.join("routes.csv"),
        }
    }
}

/// Loads a network from the two dataset files.
pub fn load(paths: &DatasetPaths) -> Result<TransportNetwork, ImportError> {
    let stops = open(&paths.stops)?;
    let routes = open(&paths.routes)?;
    let network = read(stops, routes)?;

    info!(
        stops = network.stop_count(),
        routes = network.route_count(),
        path = %paths.stops.display(),
        "dataset loaded"
    );

    Ok(network)
}

fn open(path: &Path) -> Result<std::fs::File, ImportError> {
    std::fs::File::open(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Builds a network from any two CSV sources.
pub fn read(stops: impl Read, routes: impl Read) -> Result<TransportNetwork, ImportError> {
    let mut builder = NetworkBuilder::new();
    read_stops(stops, &mut builder)?;
    read_routes(routes, &mut builder)?;
    Ok(builder.build())
}

fn read_stops(source: impl Read, builder: &mut NetworkBuilder) -> Result<(), ImportError> {
    const FILE: &str = "stops.csv";

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    for record in reader.records() {
        let record = record?;
        let line = line_of(&record);
        let row_error = |message: String| ImportError::Row {
            file: FILE,
            line,
            message,
        };

        if record.len() < 4 {
            return Err(row_error(format!(
                "expected 4 columns, found {}",
                record.len()
            )));
        }

        let code = StopCode::parse(&record[0]).map_err(|e| row_error(e.to_string()))?;
        let latitude = parse_number(&record[2]).map_err(&row_error)?;
        let longitude = parse_number(&record[3]).map_err(&row_error)?;
        let location = Coordinate::new(latitude, longitude)
            .ok_or_else(|| row_error("coordinates must be finite".to_string()))?;
        let stop = Stop::new(code, &record[1], location)
            .ok_or_else(|| row_error("stop name must not be empty".to_string()))?;

        builder
            .add_stop(stop)
            .map_err(|source| ImportError::Network {
                file: FILE,
                line,
                source,
            })?;
    }

    Ok(())
}

fn read_routes(source: impl Read, builder: &mut NetworkBuilder) -> Result<(), ImportError> {
    const FILE: &str = "routes.csv";
    const COLUMNS: usize = FIRST_COST_COLUMN + 3 * MODE_COUNT;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    for record in reader.records() {
        let record = record?;
        let line = line_of(&record);
        let row_error = |message: String| ImportError::Row {
            file: FILE,
            line,
            message,
        };

        if record.len() < COLUMNS {
            return Err(row_error(format!(
                "expected {COLUMNS} columns, found {}",
                record.len()
            )));
        }

        let mut costs = RouteCosts::new();
        for (offset, mode) in TransportMode::ALL.into_iter().enumerate() {
            let column = FIRST_COST_COLUMN + offset;
            if record[column].is_empty() {
                continue;
            }
            let distance = parse_number(&record[column]).map_err(&row_error)?;
            let duration = parse_number(&record[column + MODE_COUNT]).map_err(&row_error)?;
            let sustainability =
                parse_number(&record[column + 2 * MODE_COUNT]).map_err(&row_error)?;

            let info = RouteInfo::new(distance, duration, sustainability).map_err(|source| {
                ImportError::Network {
                    file: FILE,
                    line,
                    source,
                }
            })?;
            costs = costs.with(mode, info);
        }

        if costs.is_empty() {
            warn!(line, from = &record[0], to = &record[1], "route with no modes skipped");
            continue;
        }

        builder
            .add_route(&record[0], &record[1], costs)
            .map_err(|source| ImportError::Network {
                file: FILE,
                line,
                source,
            })?;
    }

    Ok(())
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_number(cell: &str) -> Result<f64, String> {
    cell.parse::<f64>()
        .map_err(|_| format!("expected a number, found {cell:?}"))
}
