//! Transport modes and compact mode sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub(crate) const MODE_COUNT: usize = 5;

/// A category of travel a route may support.
///
/// Declaration order is significant: mode sets iterate in this order, the
/// dataset columns follow it, and path search prefers the earlier mode when
/// two modes cost exactly the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Train,
    Bus,
    Boat,
    Walk,
    Bicycle,
}

impl TransportMode {
    /// All modes in declaration order.
    pub const ALL: [TransportMode; MODE_COUNT] = [
        TransportMode::Train,
        TransportMode::Bus,
        TransportMode::Boat,
        TransportMode::Walk,
        TransportMode::Bicycle,
    ];

    /// Returns the lowercase name used in files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Train => "train",
            TransportMode::Bus => "bus",
            TransportMode::Boat => "boat",
            TransportMode::Walk => "walk",
            TransportMode::Bicycle => "bicycle",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown transport mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for TransportMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransportMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// A set of transport modes, stored as a bitset.
///
/// Iteration always yields modes in declaration order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeSet(u8);

impl ModeSet {
    /// The empty set.
    pub const fn empty() -> Self {
        ModeSet(0)
    }

    /// The set of every mode.
    pub fn all() -> Self {
        TransportMode::ALL.into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(&self, mode: TransportMode) -> bool {
        self.0 & mode.bit() != 0
    }

    /// Adds a mode. Returns true if it was not already present.
    pub fn insert(&mut self, mode: TransportMode) -> bool {
        let added = !self.contains(mode);
        self.0 |= mode.bit();
        added
    }

    /// Removes a mode. Returns true if it was present.
    pub fn remove(&mut self, mode: TransportMode) -> bool {
        let present = self.contains(mode);
        self.0 &= !mode.bit();
        present
    }

    pub fn intersection(self, other: ModeSet) -> ModeSet {
        ModeSet(self.0 & other.0)
    }

    pub fn difference(self, other: ModeSet) -> ModeSet {
        ModeSet(self.0 & !other.0)
    }

    /// Iterates the modes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = TransportMode> + '_ {
        TransportMode::ALL
            .into_iter()
            .filter(move |mode| self.contains(*mode))
    }
}

impl FromIterator<TransportMode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = TransportMode>>(iter: I) -> Self {
        let mut set = ModeSet::empty();
        for mode in iter {
            set.insert(mode);
        }
        set
    }
}

impl<const N: usize> From<[TransportMode; N]> for ModeSet {
    fn from(modes: [TransportMode; N]) -> Self {
        modes.into_iter().collect()
    }
}

impl fmt::Debug for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ModeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|m| m.as_str()).collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for ModeSet {
    type Err = UnknownMode;

    /// Parses a comma-separated list such as `bus,train`. `all` selects
    /// every mode.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(ModeSet::all());
        }
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(TransportMode::from_str)
            .collect()
    }
}

impl Serialize for ModeSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for ModeSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let modes = Vec::<TransportMode>::deserialize(deserializer)?;
        Ok(modes.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!("bus".parse::<TransportMode>().unwrap(), TransportMode::Bus);
        assert_eq!(
            " Bicycle ".parse::<TransportMode>().unwrap(),
            TransportMode::Bicycle
        );
        assert!("tram".parse::<TransportMode>().is_err());
    }

    #[test]
    fn set_insert_remove() {
        let mut set = ModeSet::empty();
        assert!(set.is_empty());
        assert!(set.insert(TransportMode::Bus));
        assert!(!set.insert(TransportMode::Bus));
        assert!(set.contains(TransportMode::Bus));
        assert_eq!(set.len(), 1);
        assert!(set.remove(TransportMode::Bus));
        assert!(!set.remove(TransportMode::Bus));
        assert!(set.is_empty());
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let set = ModeSet::from([TransportMode::Bicycle, TransportMode::Train, TransportMode::Walk]);
        let modes: Vec<_> = set.iter().collect();
        assert_eq!(
            modes,
            vec![TransportMode::Train, TransportMode::Walk, TransportMode::Bicycle]
        );
    }

    #[test]
    fn set_algebra() {
        let a = ModeSet::from([TransportMode::Bus, TransportMode::Train]);
        let b = ModeSet::from([TransportMode::Bus, TransportMode::Boat]);
        assert_eq!(a.intersection(b), ModeSet::from([TransportMode::Bus]));
        assert_eq!(a.difference(b), ModeSet::from([TransportMode::Train]));
    }

    #[test]
    fn parse_set() {
        let set: ModeSet = "bus, train".parse().unwrap();
        assert_eq!(set, ModeSet::from([TransportMode::Bus, TransportMode::Train]));
        assert_eq!("all".parse::<ModeSet>().unwrap(), ModeSet::all());
        assert!("bus,tram".parse::<ModeSet>().is_err());
        assert_eq!(set.to_string(), "train,bus");
    }

    #[test]
    fn serde_as_list() {
        let set = ModeSet::from([TransportMode::Walk, TransportMode::Boat]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, "[\"boat\",\"walk\"]");
        let back: ModeSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
