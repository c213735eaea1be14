//! Public-transport network engine.
//!
//! Models stops and multi-mode routes as a graph and answers path,
//! reachability and degree queries over it, while routes, modes and the
//! bicycle duration scale are switched at runtime with undoable commands.

pub mod analytics;
pub mod config;
pub mod engine;
pub mod journal;
pub mod network;
pub mod path;
pub mod settings;

pub use engine::TransportMap;
