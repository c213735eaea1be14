//! Path criteria and the cost accessors behind them.
//!
//! Each criteria reads and writes exactly one dimension of a [`RouteInfo`].
//! The accessors are plain functions in a table indexed by the enum, so
//! selecting a criteria never involves dynamic dispatch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::network::{RouteInfo, TransportError};

/// The cost dimension a path search minimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathCriteria {
    Distance,
    Duration,
    Sustainability,
}

struct Accessor {
    name: &'static str,
    unit: &'static str,
    get: fn(&RouteInfo) -> f64,
    put: fn(&mut RouteInfo, f64),
}

static ACCESSORS: [Accessor; 3] = [
    Accessor {
        name: "distance",
        unit: "km",
        get: get_distance,
        put: put_distance,
    },
    Accessor {
        name: "duration",
        unit: "min",
        get: get_duration,
        put: put_duration,
    },
    Accessor {
        name: "sustainability",
        unit: "carbon",
        get: get_sustainability,
        put: put_sustainability,
    },
];

fn get_distance(info: &RouteInfo) -> f64 {
    info.distance
}

fn put_distance(info: &mut RouteInfo, value: f64) {
    info.distance = value;
}

fn get_duration(info: &RouteInfo) -> f64 {
    info.duration
}

fn put_duration(info: &mut RouteInfo, value: f64) {
    info.duration = value;
}

fn get_sustainability(info: &RouteInfo) -> f64 {
    info.sustainability
}

fn put_sustainability(info: &mut RouteInfo, value: f64) {
    info.sustainability = value;
}

impl PathCriteria {
    /// All criteria in declaration order.
    pub const ALL: [PathCriteria; 3] = [
        PathCriteria::Distance,
        PathCriteria::Duration,
        PathCriteria::Sustainability,
    ];

    fn accessor(self) -> &'static Accessor {
        &ACCESSORS[self as usize]
    }

    /// Reads this dimension.
    pub fn get(self, info: &RouteInfo) -> f64 {
        (self.accessor().get)(info)
    }

    /// Writes this dimension. The value must be finite and non-negative.
    pub fn set(self, info: &mut RouteInfo, value: f64) -> Result<(), TransportError> {
        if !value.is_finite() || value < 0.0 {
            return Err(TransportError::InvalidValue {
                what: self.as_str(),
                value,
            });
        }
        self.put(info, value);
        Ok(())
    }

    /// Writes this dimension unchecked. Path totals use this, since summing
    /// finite costs can overflow to infinity.
    pub(crate) fn put(self, info: &mut RouteInfo, value: f64) {
        (self.accessor().put)(info, value);
    }

    /// The other two criteria, in declaration order. Used to break ties.
    pub fn alternates(self) -> [PathCriteria; 2] {
        match self {
            PathCriteria::Distance => [PathCriteria::Duration, PathCriteria::Sustainability],
            PathCriteria::Duration => [PathCriteria::Distance, PathCriteria::Sustainability],
            PathCriteria::Sustainability => [PathCriteria::Distance, PathCriteria::Duration],
        }
    }

    /// This criteria followed by its alternates: the order in which path
    /// costs are compared.
    pub fn priority(self) -> [PathCriteria; 3] {
        let [first, second] = self.alternates();
        [self, first, second]
    }

    pub fn as_str(self) -> &'static str {
        self.accessor().name
    }

    /// Unit of measure for display.
    pub fn unit(self) -> &'static str {
        self.accessor().unit
    }
}

impl fmt::Display for PathCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathCriteria {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathCriteria::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TransportError::UnsupportedCriteria(s.to_string()))
    }
}
