//! Path search over the overridden network.
//!
//! Searches always read the current override state, so results follow every
//! configuration change without any cache to invalidate.

mod criteria;
mod dijkstra;
mod reach;
mod result;


pub use criteria::PathCriteria;
pub use dijkstra::{find_path, find_path_via};
pub use reach::{Reached, Traversal, reachable_within, traverse};
pub use result::{PathResult, PathStep};
