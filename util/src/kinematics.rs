//! Constant acceleration kinematics
//!
//! All functions work in a single consistent set of units (for the planner
//! these are meters, seconds, meters/second and meters/second^2). Nothing here
//! rounds or truncates, any quantisation required by a command interface shall
//! be done by the caller.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Relative tolerance under which a negative discriminant is treated as
/// floating point round-off and clamped to zero.
pub const DISCRIMINANT_REL_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while solving the motion equations.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum KinematicsError {
    #[error(
        "Distance {distance} cannot be covered from {velocity} with acceleration \
        {acceleration} (negative discriminant {discriminant})"
    )]
    NegativeDiscriminant {
        distance: f64,
        velocity: f64,
        acceleration: f64,
        discriminant: f64
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Velocity after accelerating for the given time, `v = u + a*t`.
pub fn final_velocity<T: Float>(initial_vel: T, accel: T, elapsed_time: T) -> T {
    initial_vel + accel * elapsed_time
}

/// Time taken to reach zero velocity, `t = -u/a`.
///
/// Returns a non-finite value if `accel` is zero, callers must guard against
/// this.
pub fn time_to_zero_velocity<T: Float>(initial_vel: T, accel: T) -> T {
    (T::zero() - initial_vel) / accel
}

/// Time taken to reach the target velocity, `t = (v - u)/a`.
pub fn time_to_velocity<T: Float>(initial_vel: T, accel: T, target_vel: T) -> T {
    (target_vel - initial_vel) / accel
}

/// Distance travelled while changing velocity at a constant rate,
/// `s = t*(u + v)/2`.
pub fn distance_travelled<T: Float>(initial_vel: T, final_vel: T, elapsed_time: T) -> T {
    elapsed_time * (initial_vel + final_vel) / two()
}

/// Distance at which to switch from accelerating to decelerating so that
/// `target_vel` is reached exactly at `total_distance`.
///
/// Both phases satisfy `v^2 = u^2 + 2*a*s`, so with a switch distance `s1`:
///
/// ```text
/// v1^2 = u^2 + 2*a_accel*s1
/// vt^2 = v1^2 + 2*a_decel*(d - s1)
/// ```
///
/// which is linear in `s1`. If `accel == decel` there is no switch point and
/// `NAN` is returned.
pub fn distance_to_braking_point<T: Float>(
    initial_vel: T,
    accel: T,
    decel: T,
    target_vel: T,
    total_distance: T
) -> T {
    if accel == decel {
        return T::nan();
    }

    -((two::<T>() * decel * total_distance
        + initial_vel * initial_vel
        - target_vel * target_vel)
        / (two::<T>() * accel - two::<T>() * decel))
}

/// Time taken to cover `distance` from `initial_vel` under constant `accel`.
///
/// Solves `s = u*t + a*t^2/2` for `t`. Of the two roots the smallest positive
/// one is returned if both are positive (the first time the distance is
/// reached), otherwise the larger one.
///
/// A zero distance or zero acceleration gives zero time.
///
/// # Errors
/// - `KinematicsError::NegativeDiscriminant` if the distance can never be
///   reached, for example braking to a stop before covering it.
pub fn time_elapsed_during_acceleration<T: Float>(
    distance: T,
    initial_vel: T,
    accel: T
) -> Result<T, KinematicsError> {
    if distance == T::zero() || accel == T::zero() {
        return Ok(T::zero());
    }

    let two_a_s = two::<T>() * accel * distance;
    let u_sq = initial_vel * initial_vel;
    let mut discriminant = two_a_s + u_sq;

    if discriminant < T::zero() {
        let tolerance = num_traits::cast::<f64, T>(DISCRIMINANT_REL_TOLERANCE)
            .unwrap_or_else(T::epsilon)
            * (two_a_s.abs() + u_sq);

        if -discriminant > tolerance {
            return Err(KinematicsError::NegativeDiscriminant {
                distance: to_f64(distance),
                velocity: to_f64(initial_vel),
                acceleration: to_f64(accel),
                discriminant: to_f64(discriminant)
            });
        }

        discriminant = T::zero();
    }

    let root_disc = discriminant.sqrt();
    let root_0 = -((root_disc + initial_vel) / accel);
    let root_1 = (root_disc - initial_vel) / accel;

    if root_0 > T::zero() && root_1 > T::zero() {
        Ok(root_0.min(root_1))
    }
    else {
        Ok(root_0.max(root_1))
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn two<T: Float>() -> T {
    T::one() + T::one()
}

fn to_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(std::f64::NAN)
}
