//! Forward replay of a planned command list
//!
//! Integrates constant acceleration motion through the commands in order,
//! exactly as an open loop executor would apply them. No clamping is done at
//! zero velocity so that a plan which would reverse the vehicle shows up as a
//! negative minimum velocity.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::AutoCmd;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Summary of the motion produced by a command list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReplaySummary {
    /// Units: meters
    pub distance_m: f64,

    /// Units: seconds
    pub duration_s: f64,

    /// Units: meters/second
    pub min_vel_ms: f64,

    /// Units: meters/second
    pub max_vel_ms: f64,

    /// Units: meters/second
    pub final_vel_ms: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Replay `cmds` starting from `initial_vel` with no acceleration applied.
///
/// Each command's delay is travelled under the acceleration set by the
/// previous command, then the command's own acceleration takes effect.
/// Motion after the final command is not included.
pub fn simulate(initial_vel: f64, cmds: &[AutoCmd]) -> ReplaySummary {
    let mut summary = ReplaySummary {
        distance_m: 0.0,
        duration_s: 0.0,
        min_vel_ms: initial_vel,
        max_vel_ms: initial_vel,
        final_vel_ms: initial_vel
    };
    let mut accel = 0.0;

    for cmd in cmds {
        let dt = cmd.delay_s;
        let vel = summary.final_vel_ms;

        if dt != 0.0 {
            summary.distance_m += vel * dt + 0.5 * accel * dt * dt;
            summary.duration_s += dt;
            summary.final_vel_ms = vel + accel * dt;
            summary.min_vel_ms = summary.min_vel_ms.min(summary.final_vel_ms);
            summary.max_vel_ms = summary.max_vel_ms.max(summary.final_vel_ms);
        }

        if let Some(a) = cmd.accel_ms2() {
            accel = a;
        }
    }

    summary
}
