//! Autonomous control module
//!
//! Plans an ordered list of timed commands which take the vehicle from its
//! current speed to the limit of the upcoming zone by the time it reaches the
//! zone boundary, without exceeding the limit of the zone it is in.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_accel;
mod calc_braking;
mod cmd;
mod params;
pub mod replay;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use calc_braking::BrakingWindow;
pub use cmd::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The maximum number of commands produced by one planning cycle.
pub const MAX_NUM_CMDS: usize = 4;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during AutoCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum AutoCtrlError {
    #[error("Could not load the AutoCtrl parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid AutoCtrl parameters: {0}")]
    InvalidParams(String),

    #[error("Could not solve the motion of the vehicle: {0}")]
    KinematicsError(#[from] util::kinematics::KinematicsError),
}
