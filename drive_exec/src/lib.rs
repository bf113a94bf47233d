//! # Drive library.
//!
//! This library allows other crates in the workspace (and the benches) to access items defined
//! inside the drive crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Autonomous control module - plans timed acceleration and braking commands for the next zone
pub mod auto_ctrl;

/// Car client - interface to the vehicle state provider and the clock used to pace commands
pub mod car_client;

/// Driver - the execution loop which replays planned commands against the state provider
pub mod driver;

/// Executable parameters
pub mod params;

/// Simulation client - an in-process vehicle state provider
pub mod sim_client;
