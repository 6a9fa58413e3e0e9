//! Derby Sim - multi-round horse race season simulation
//!
//! A pool of generated horses runs a fixed schedule of rounds. Each race is
//! driven by a tick engine, finish orders feed a season points table, and a
//! grand final ranking closes the season.

pub mod core;
pub mod generation;
pub mod race;
pub mod schedule;
pub mod season;
pub mod store;
