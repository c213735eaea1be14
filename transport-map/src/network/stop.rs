//! Stop identity and location types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop code: {reason}")]
pub struct InvalidStopCode {
    reason: &'static str,
}

/// The unique identity code of a stop.
///
/// Codes are non-empty, carry no surrounding whitespace and contain no
/// control characters. Ordering is plain string ordering, which analytics
/// use to break ties deterministically.
///
/// # Examples
///
/// ```
/// use transport_map::network::StopCode;
///
/// let code = StopCode::parse("CAC").unwrap();
/// assert_eq!(code.as_str(), "CAC");
///
/// assert!(StopCode::parse("").is_err());
/// assert!(StopCode::parse(" CAC").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopCode(String);

impl StopCode {
    /// Parse a stop code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStopCode> {
        if s.is_empty() {
            return Err(InvalidStopCode {
                reason: "must not be empty",
            });
        }

        if s.trim() != s {
            return Err(InvalidStopCode {
                reason: "must not start or end with whitespace",
            });
        }

        if s.chars().any(char::is_control) {
            return Err(InvalidStopCode {
                reason: "must not contain control characters",
            });
        }

        Ok(StopCode(s.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopCode {
    type Error = InvalidStopCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StopCode::parse(&value)
    }
}

impl From<StopCode> for String {
    fn from(code: StopCode) -> Self {
        code.0
    }
}

impl fmt::Debug for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopCode({})", self.0)
    }
}

impl fmt::Display for StopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, or `None` if either component is not finite.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }
}

/// A stop in the transport network.
///
/// Stops are immutable once created and are never removed from a network;
/// only the routes between them can be disabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    code: StopCode,
    name: String,
    location: Coordinate,
}

impl Stop {
    /// Creates a stop. Returns `None` if the display name is blank.
    pub fn new(code: StopCode, name: impl Into<String>, location: Coordinate) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }
        Some(Self {
            code,
            name,
            location,
        })
    }

    pub fn code(&self) -> &StopCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
