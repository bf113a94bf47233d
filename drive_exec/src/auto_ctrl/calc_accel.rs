//! Acceleration calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::kinematics::time_to_velocity;

use super::AutoCtrl;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutoCtrl {

    /// Get the acceleration force and duration needed to change speed by
    /// `vel_delta`.
    ///
    /// The force is capped at `max_accel_force` and floored to a whole number,
    /// which is all the command interface accepts. If the floored force is
    /// zero no acceleration is made and `(0, 0)` is returned.
    pub(crate) fn calc_accel_needed(&self, vel_delta: f64) -> (f64, f64) {
        let accel_force = vel_delta.min(self.params.max_accel_force).floor();

        if accel_force <= 0.0 {
            return (0.0, 0.0);
        }

        (accel_force, vel_delta / accel_force)
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Shorten the acceleration phase if the vehicle, accelerating the whole way,
/// would still be below `target_vel` on reaching the boundary.
///
/// The boundary is then crossed part way through the acceleration, which must
/// end at `target_vel` rather than at `max_vel`.
///
/// # Outputs
/// - `Some(duration)` of the shortened phase, ending at `target_vel`.
/// - `None` if the phase is unchanged.
pub(crate) fn cap_accel_at_boundary(
    current_vel: f64,
    accel_force: f64,
    max_vel: f64,
    distance: f64,
    target_vel: f64
) -> Option<f64> {
    if accel_force <= 0.0 || max_vel <= target_vel {
        return None;
    }

    let boundary_vel = (current_vel * current_vel 
        + 2.0 * accel_force * distance).sqrt();

    match boundary_vel <= target_vel {
        true => Some(time_to_velocity(current_vel, accel_force, target_vel)),
        false => None
    }
}

#[cfg(test)]
mod test {
    use super::super::*;

    #[test]
    fn test_calc_accel_needed() {
        let auto_ctrl = AutoCtrl::default();

        assert_eq!(auto_ctrl.calc_accel_needed(24.0), (6.0, 4.0));
        assert_eq!(auto_ctrl.calc_accel_needed(30.0), (6.0, 5.0));

        // Small deltas use a smaller, whole, force
        let (force, dur) = auto_ctrl.calc_accel_needed(4.5);
        assert_eq!(force, 4.0);
        assert_eq!(dur, 1.125);

        // Below a whole unit nothing can be demanded
        assert_eq!(auto_ctrl.calc_accel_needed(0.75), (0.0, 0.0));
        assert_eq!(auto_ctrl.calc_accel_needed(0.0), (0.0, 0.0));
    }

    #[test]
    fn test_cap_accel_at_boundary() {
        // 0 -> 24 at 6 crosses a boundary 5 m away at under 8 m/s, so only
        // accelerate to the 12 m/s ahead.
        assert_eq!(
            super::cap_accel_at_boundary(0.0, 6.0, 24.0, 5.0, 12.0), 
            Some(2.0)
        );

        // Long enough to need braking for the limit ahead
        assert_eq!(
            super::cap_accel_at_boundary(0.0, 6.0, 24.0, 100.0, 12.0), 
            None
        );

        // Already no faster than the limit ahead
        assert_eq!(
            super::cap_accel_at_boundary(0.0, 6.0, 24.0, 5.0, 40.0), 
            None
        );
        assert_eq!(
            super::cap_accel_at_boundary(12.0, 0.0, 12.0, 5.0, 6.0), 
            None
        );
    }
}
