//! Parameters structure for AutoCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use super::AutoCtrlError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for autonomous control.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Params {

    // ---- CAPABILITIES ----

    /// Magnitude of the braking demand. The command interface only accepts
    /// whole number forces so this must be a positive whole number.
    ///
    /// Units: meters/second^2
    pub braking_force: f64,

    /// Maximum acceleration demand.
    ///
    /// Units: meters/second^2
    pub max_accel_force: f64,

    // ---- POLICY ----

    /// Speed to brake to when the upcoming zone's limit is reported as zero.
    ///
    /// A zero limit cannot be told apart from an unspecified one, so rather
    /// than stopping at the boundary the vehicle is only slowed to this speed
    /// and the stop is made once inside the zone.
    ///
    /// Units: meters/second
    pub safe_braking_speed: f64,

    /// If the vehicle will cross the boundary in less than this time a
    /// pass-through coast is issued before the rest of the plan.
    ///
    /// Units: seconds
    pub boundary_guard_s: f64,

    /// How long to hold when stationary with no acceleration to make.
    ///
    /// Units: seconds
    pub stationary_hold_s: f64,

    /// Speeds over the current limit by no more than this are round-off and
    /// are not braked for.
    ///
    /// Units: meters/second
    pub overspeed_tolerance_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            braking_force: 6.0,
            max_accel_force: 6.0,
            safe_braking_speed: 24.0,
            boundary_guard_s: 0.5,
            stationary_hold_s: 1.0,
            overspeed_tolerance_ms: 1e-6,
        }
    }
}

impl Params {

    /// Check the parameters are usable by the planner.
    pub fn validate(&self) -> Result<(), AutoCtrlError> {
        if !(self.braking_force > 0.0) || self.braking_force.fract() != 0.0 {
            return Err(AutoCtrlError::InvalidParams(format!(
                "braking_force must be a positive whole number, found {}",
                self.braking_force
            )));
        }
        if !(self.max_accel_force >= 1.0) {
            return Err(AutoCtrlError::InvalidParams(format!(
                "max_accel_force must be at least 1, found {}",
                self.max_accel_force
            )));
        }
        if !(self.safe_braking_speed > 0.0) {
            return Err(AutoCtrlError::InvalidParams(format!(
                "safe_braking_speed must be positive, found {}",
                self.safe_braking_speed
            )));
        }
        if !(self.boundary_guard_s >= 0.0) || !(self.stationary_hold_s > 0.0) {
            return Err(AutoCtrlError::InvalidParams(format!(
                "boundary_guard_s ({}) must not be negative and stationary_hold_s ({}) must be \
                positive",
                self.boundary_guard_s,
                self.stationary_hold_s
            )));
        }
        if !(self.overspeed_tolerance_ms >= 0.0) {
            return Err(AutoCtrlError::InvalidParams(format!(
                "overspeed_tolerance_ms must not be negative, found {}",
                self.overspeed_tolerance_ms
            )));
        }

        Ok(())
    }
}
