//! Commands produced by AutoCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::car::{CarAction, CarActionType};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command to be issued to the vehicle after a delay.
///
/// The delay is relative to the issuing of the previous command in the plan,
/// so a plan is a timeline expressed as successive deltas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoCmd {

    /// The type of command to issue
    pub cmd_type: AutoCmdType,

    /// Time to wait before issuing this command.
    ///
    /// Units: seconds
    pub delay_s: f64,

    /// Force magnitude of the command. Always non-negative, braking is
    /// negative acceleration even though its force is positive.
    ///
    /// Units: meters/second^2
    pub force: Option<i32>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible commands issued by AutoCtrl.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoCmdType {
    /// Accelerate with the given force, a zero force is a coast.
    Accelerate,
    /// Brake with the given force.
    Brake,
    /// Turn the ignition off, ending the run.
    IgnitionOff,
    /// Turn the ignition on.
    IgnitionOn,
    /// Wait only. Equivalent to a zero force accelerate if it's ever sent.
    Delay
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutoCmd {

    /// Accelerate with a whole number force.
    pub fn accelerate(force: f64, delay_s: f64) -> Self {
        Self {
            cmd_type: AutoCmdType::Accelerate,
            delay_s,
            force: Some(force as i32)
        }
    }

    /// Coast, i.e. accelerate with zero force.
    pub fn coast(delay_s: f64) -> Self {
        Self::accelerate(0.0, delay_s)
    }

    /// Brake with a whole number force.
    pub fn brake(force: f64, delay_s: f64) -> Self {
        Self {
            cmd_type: AutoCmdType::Brake,
            delay_s,
            force: Some(force as i32)
        }
    }

    /// Wait without issuing anything.
    pub fn hold(delay_s: f64) -> Self {
        Self {
            cmd_type: AutoCmdType::Delay,
            delay_s,
            force: None
        }
    }

    /// Turn the ignition on or off immediately.
    pub fn ignition(on: bool) -> Self {
        Self {
            cmd_type: match on {
                true => AutoCmdType::IgnitionOn,
                false => AutoCmdType::IgnitionOff
            },
            delay_s: 0.0,
            force: None
        }
    }

    /// Determine if the command is sent to the vehicle, `Delay` only waits.
    pub fn is_issued(&self) -> bool {
        self.cmd_type != AutoCmdType::Delay
    }

    /// The signed acceleration this command puts the vehicle under, or `None`
    /// if the command leaves the acceleration unchanged.
    ///
    /// Units: meters/second^2
    pub fn accel_ms2(&self) -> Option<f64> {
        let force = self.force.unwrap_or(0) as f64;

        match self.cmd_type {
            AutoCmdType::Accelerate => Some(force),
            AutoCmdType::Brake => Some(-force),
            AutoCmdType::IgnitionOff => Some(0.0),
            AutoCmdType::IgnitionOn | AutoCmdType::Delay => None
        }
    }

    /// Convert into the action sent to the state provider.
    pub fn to_car_action(&self) -> CarAction {
        match self.cmd_type {
            AutoCmdType::Delay => CarAction {
                action: CarActionType::Accelerate,
                force: Some(0)
            },
            AutoCmdType::IgnitionOn => CarAction::ignition(true),
            AutoCmdType::IgnitionOff => CarAction::ignition(false),
            AutoCmdType::Accelerate => CarAction {
                action: CarActionType::Accelerate,
                force: self.force
            },
            AutoCmdType::Brake => CarAction {
                action: CarActionType::Brake,
                force: self.force
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_car_action() {
        assert_eq!(
            AutoCmd::hold(1.0).to_car_action(), 
            CarAction { action: CarActionType::Accelerate, force: Some(0) }
        );
        assert_eq!(
            AutoCmd::ignition(false).to_car_action(), 
            CarAction { action: CarActionType::IgnitionOff, force: None }
        );
        assert_eq!(
            AutoCmd::brake(6.0, 3.25).to_car_action(), 
            CarAction { action: CarActionType::Brake, force: Some(6) }
        );
        assert_eq!(
            AutoCmd::accelerate(5.0, 0.0).to_car_action(), 
            CarAction { action: CarActionType::Accelerate, force: Some(5) }
        );
    }

    #[test]
    fn test_accel_ms2() {
        assert_eq!(AutoCmd::brake(6.0, 0.0).accel_ms2(), Some(-6.0));
        assert_eq!(AutoCmd::coast(1.0).accel_ms2(), Some(0.0));
        assert_eq!(AutoCmd::hold(1.0).accel_ms2(), None);
        assert!(!AutoCmd::hold(1.0).is_issued());
        assert!(AutoCmd::ignition(true).is_issued());
    }
}
