//! Braking calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{trace, warn};
use util::kinematics::{
    distance_to_braking_point,
    distance_travelled,
    final_velocity,
    time_elapsed_during_acceleration
};

use super::{AutoCtrl, AutoCtrlError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// When braking must start and end, relative to the start of the plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrakingWindow {
    /// Units: seconds
    pub start_s: f64,

    /// Units: seconds
    pub end_s: f64,

    /// True if braking had to start before the acceleration phase completed.
    pub cuts_accel_short: bool,

    /// True if the vehicle cannot reach the target speed by the boundary even
    /// when braking immediately.
    pub late: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutoCtrl {

    /// Calculate the braking needed to be at `target_vel` on reaching the
    /// boundary, given the planned acceleration phase.
    ///
    /// # Inputs
    /// - `current_vel`: velocity at the start of the plan.
    /// - `accel_force`: force of the acceleration phase (may be zero).
    /// - `max_vel`: velocity at the end of the acceleration phase.
    /// - `distance`: distance to the boundary.
    /// - `target_vel`: velocity to be at on reaching the boundary.
    ///
    /// # Outputs
    /// - `Ok(None)` if no braking is needed.
    /// - `Ok(Some(window))` giving the braking start and end times.
    pub(crate) fn calc_braking_needed(
        &self,
        current_vel: f64,
        accel_force: f64,
        max_vel: f64,
        distance: f64,
        target_vel: f64
    ) -> Result<Option<BrakingWindow>, AutoCtrlError> {

        if max_vel <= target_vel {
            return Ok(None);
        }

        let braking_force = self.params.braking_force;

        let accel_time_s = match accel_force == 0.0 {
            true => 0.0,
            false => (max_vel - current_vel) / accel_force
        };
        let accel_dist = distance_travelled(current_vel, max_vel, accel_time_s);
        let decel_dist = distance_travelled(
            max_vel, 
            target_vel, 
            (max_vel - target_vel) / braking_force
        );

        trace!(
            "Braking needed: accel_dist = {:.3}, decel_dist = {:.3}, distance = {:.3}", 
            accel_dist, 
            decel_dist, 
            distance
        );

        // If accelerating fully then braking overshoots the boundary find the
        // point within the acceleration at which braking must start.
        if accel_dist + decel_dist > distance {
            let mut late = false;
            let mut dist_to_brake = distance_to_braking_point(
                current_vel, 
                accel_force, 
                -braking_force, 
                target_vel, 
                distance
            );

            // A switch point behind the vehicle means even braking now won't
            // reach the target speed in time.
            if dist_to_brake < 0.0 {
                warn!(
                    "Cannot slow from {:.3} to {:.3} within {:.3}, braking immediately",
                    current_vel,
                    target_vel,
                    distance
                );
                dist_to_brake = 0.0;
                late = true;
            }

            let accel_time_s = time_elapsed_during_acceleration(
                dist_to_brake, 
                current_vel, 
                accel_force
            )?;
            let brake_vel = final_velocity(current_vel, accel_force, accel_time_s);
            let decel_time_s = time_elapsed_during_acceleration(
                distance - dist_to_brake, 
                brake_vel, 
                -braking_force
            )?;

            return Ok(Some(BrakingWindow {
                start_s: accel_time_s,
                end_s: accel_time_s + decel_time_s,
                cuts_accel_short: true,
                late
            }));
        }

        // The phases don't overlap, so accelerate, coast, then brake, with
        // the three partitioning the distance exactly.
        let accel_time_s = match accel_force == 0.0 {
            true => 0.0,
            false => time_elapsed_during_acceleration(accel_dist, current_vel, accel_force)?
        };
        let decel_time_s = time_elapsed_during_acceleration(
            decel_dist, 
            max_vel, 
            -braking_force
        )?;
        let coast_time_s = (distance - (accel_dist + decel_dist)) / max_vel;

        Ok(Some(BrakingWindow {
            start_s: accel_time_s + coast_time_s,
            end_s: accel_time_s + decel_time_s + coast_time_s,
            cuts_accel_short: false,
            late: false
        }))
    }
}

#[cfg(test)]
mod test {
    use super::super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_no_braking() {
        let auto_ctrl = AutoCtrl::default();
        assert_eq!(
            auto_ctrl.calc_braking_needed(0.0, 6.0, 24.0, 96.0, 24.0).unwrap(), 
            None
        );
    }

    #[test]
    fn test_coast_then_brake() {
        let auto_ctrl = AutoCtrl::default();

        // 48 m/s down to 24 m/s takes 144 m and 4 s, the remaining 156 m is
        // coasted at 48 m/s.
        let window = auto_ctrl
            .calc_braking_needed(48.0, 0.0, 48.0, 300.0, 24.0)
            .unwrap()
            .unwrap();
        assert!((window.start_s - 3.25).abs() < EPS);
        assert!((window.end_s - 7.25).abs() < EPS);
        assert!(!window.cuts_accel_short);
    }

    #[test]
    fn test_accel_cut_short() {
        let auto_ctrl = AutoCtrl::default();

        // Accelerating 30 -> 60 and braking 60 -> 30 needs 450 m, only 180 m
        // available so switch at the halfway point.
        let window = auto_ctrl
            .calc_braking_needed(30.0, 6.0, 60.0, 180.0, 30.0)
            .unwrap()
            .unwrap();
        let half_s = (1980f64.sqrt() - 30.0) / 6.0;
        assert!((window.start_s - half_s).abs() < EPS);
        assert!((window.end_s - 2.0 * half_s).abs() < EPS);
        assert!(window.cuts_accel_short);
        assert!(!window.late);
    }

    #[test]
    fn test_brake_immediately() {
        let auto_ctrl = AutoCtrl::default();

        // 30 -> 10 needs 66.7 m of braking, only 20 m available
        let window = auto_ctrl
            .calc_braking_needed(30.0, 6.0, 60.0, 20.0, 10.0)
            .unwrap()
            .unwrap();
        assert_eq!(window.start_s, 0.0);
        assert!(window.late);
        assert!((window.end_s - (30.0 - 660f64.sqrt()) / 6.0).abs() < EPS);
    }
}
