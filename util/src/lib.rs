//! Utility library for the cruise planner software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod host;
pub mod kinematics;
pub mod logger;
pub mod module;
pub mod params;
pub mod session;
pub mod time;
