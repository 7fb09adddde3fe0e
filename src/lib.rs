// Lectern: neighbour-based book recommendations
//
// This is the library root. Each module corresponds to a major subsystem:
// the rating store, the recommendation core, and the CLI/HTTP boundaries.

pub mod config;
pub mod db;
pub mod output;
pub mod recommend;
pub mod status;

#[cfg(feature = "web")]
pub mod web;
