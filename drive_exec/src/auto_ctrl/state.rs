//! Implementations for the AutoCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use serde::Serialize;

// Internal
use super::{
    calc_accel::cap_accel_at_boundary, 
    AutoCmd, 
    AutoCtrlError, 
    Params, 
    MAX_NUM_CMDS
};
use comms_if::eqpt::{car::Car, road::Road};
use util::{
    kinematics::{distance_travelled, final_velocity},
    module::State,
    params,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Autonomous control module state
#[derive(Default)]
pub struct AutoCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,
}

/// Input data to Autonomous Control.
#[derive(Clone, Debug, Default)]
pub struct InputData {
    /// Latest vehicle state, `None` if it couldn't be obtained.
    pub car: Option<Car>,

    /// Latest road state, `None` if it couldn't be obtained.
    pub road: Option<Road>,

    /// Time by which transitions are brought forward to make up for the
    /// latency in issuing commands.
    ///
    /// Units: seconds
    pub safety_margin_s: f64,
}

/// Status report for AutoCtrl processing, flagging which parts of the plan
/// were produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// The run is over (or the state is unusable) and the ignition is to be
    /// switched off.
    pub shutdown: bool,

    /// Braking immediately, either overspeed or approaching the end of the
    /// known road.
    pub overspeed_brake: bool,

    /// Stopped in a zone with a zero limit and pulling away into the next.
    pub departing_stop: bool,

    /// The boundary will be crossed too soon to plan against it, a
    /// pass-through coast was issued first.
    pub boundary_guard: bool,

    pub accelerating: bool,

    /// Accelerating the whole way still leaves the vehicle below the limit
    /// ahead at the boundary, so the acceleration only goes up to that limit.
    pub accel_capped: bool,

    /// The boundary is crossed before the acceleration ends.
    pub boundary_in_accel: bool,

    pub braking: bool,

    /// The target speed cannot be reached by the boundary even braking
    /// immediately.
    pub late_braking: bool,

    pub coasting: bool,

    /// Stationary with nothing to do, holding before planning again.
    pub stationary_hold: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AutoCtrl {

    /// Create a new instance from the given parameters.
    pub fn from_params(params: Params) -> Result<Self, AutoCtrlError> {
        params.validate()?;

        Ok(Self {
            params,
            report: StatusReport::default()
        })
    }

    /// Get the parameters in use.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Plan the commands needed to take the vehicle through to the next zone
    /// boundary.
    ///
    /// The plan depends only on the inputs, no state is kept between calls.
    ///
    /// # Inputs
    /// - `car`: Vehicle state, `None` if unknown.
    /// - `road`: Road state, `None` if unknown.
    /// - `safety_margin_s`: Latency compensation in seconds, subtracted from
    ///   the delays of transitions into a coast and added to the final coast.
    ///
    /// # Outputs
    /// - Between 1 and `MAX_NUM_CMDS` commands, in the order they are to be
    ///   issued, and a report of the plan.
    pub fn plan_actions(
        &self,
        car: Option<&Car>,
        road: Option<&Road>,
        safety_margin_s: f64
    ) -> Result<(Vec<AutoCmd>, StatusReport), AutoCtrlError> {

        let mut report = StatusReport::default();
        let mut cmds = Vec::with_capacity(MAX_NUM_CMDS);

        let braking_force = self.params.braking_force;

        // ---- SHUTDOWN ----

        let (car, road) = match (car, road) {
            (Some(c), Some(r)) => (c, r),
            _ => {
                warn!("Vehicle or road state unavailable, shutting down");
                report.shutdown = true;
                cmds.push(AutoCmd::ignition(false));
                return Ok((cmds, report));
            }
        };

        let vel = car.velocity();
        let ahead = &road.speed_limit_ahead;

        if vel == 0.0 && !road.has_zone_ahead() {
            info!("Stopped at the end of the road, shutting down");
            report.shutdown = true;
            cmds.push(AutoCmd::ignition(false));
            return Ok((cmds, report));
        }

        // ---- VELOCITY DELTA ----

        let current_max = road.current_speed_limit.max.unwrap_or(0.0);
        let mut vel_delta = current_max - vel;

        if vel_delta < 0.0 && -vel_delta <= self.params.overspeed_tolerance_ms {
            vel_delta = 0.0;
        }

        // Nothing is known beyond the boundary so come to a stop
        if ahead.max.is_none() {
            vel_delta = -vel;
        }

        if vel_delta < 0.0 {
            warn!(
                "Braking immediately at {:.3} m/s (zone max {:.3} m/s, limit ahead {:?})", 
                vel, 
                current_max,
                ahead.max
            );
            report.overspeed_brake = true;
            cmds.push(AutoCmd::brake(braking_force, 0.0));
            cmds.push(AutoCmd::coast(
                (vel_delta / braking_force).abs() - safety_margin_s
            ));
            return Ok((cmds, report));
        }

        if vel_delta == 0.0 && vel == 0.0 {
            vel_delta = ahead.max.unwrap_or(0.0);

            if vel_delta > 0.0 {
                info!("Stopped in a zero limit zone, departing");
                report.departing_stop = true;
            }
        }

        // ---- BOUNDARY GUARD ----

        if let Some(dist) = ahead.remaining_distance_to_enforcement {
            if vel != 0.0 && dist / vel < self.params.boundary_guard_s {
                warn!(
                    "Only {:.3} m to the boundary at {:.3} m/s, passing through before planning", 
                    dist, 
                    vel
                );
                report.boundary_guard = true;
                cmds.push(AutoCmd::coast(dist / vel));
            }
        }

        // ---- ACCELERATION AND BRAKING ----

        let distance = ahead.remaining_distance_to_enforcement.unwrap_or(0.0);

        let (accel_force, mut accel_end_s) = self.calc_accel_needed(vel_delta);
        let mut max_vel = final_velocity(vel, accel_force, accel_end_s);

        // A zero limit ahead is only slowed for here, the stop itself is
        // made once inside the zone.
        let target_vel = match ahead.max {
            Some(m) if m != 0.0 => m,
            _ => self.params.safe_braking_speed
        };

        if let Some(capped_s) = cap_accel_at_boundary(
            vel, 
            accel_force, 
            max_vel, 
            distance, 
            target_vel
        ) {
            debug!(
                "Boundary reached below {:.3} m/s, accelerating to it for {:.3} s", 
                target_vel, 
                capped_s
            );
            report.accel_capped = true;
            accel_end_s = capped_s;
            max_vel = target_vel;
        }

        let braking = self.calc_braking_needed(
            vel, 
            accel_force, 
            max_vel, 
            distance, 
            target_vel
        )?;

        trace!(
            "AutoCtrl: accel {} for {:.3} s to {:.3} m/s, braking {:?}", 
            accel_force, 
            accel_end_s, 
            max_vel, 
            braking
        );

        // ---- COMMANDS ----

        let mut delay_offset_s = 0.0;

        if accel_force > 0.0 {
            report.accelerating = true;
            cmds.push(AutoCmd::accelerate(accel_force, 0.0));

            let accel_ends_first = match braking {
                Some(w) => accel_end_s < w.start_s,
                None => true
            };

            if accel_ends_first {
                cmds.push(AutoCmd::coast(accel_end_s - safety_margin_s));
                delay_offset_s = accel_end_s;
            }
        }

        if let Some(window) = braking {
            report.braking = true;
            report.late_braking = window.late;

            cmds.push(AutoCmd::brake(braking_force, window.start_s - delay_offset_s));
            cmds.push(AutoCmd::coast(window.end_s - window.start_s + safety_margin_s));
        }
        else if accel_force != 0.0 {
            report.coasting = true;

            // If the boundary comes first the plan ends with the acceleration
            let accel_dist = distance_travelled(vel, max_vel, accel_end_s);
            if accel_dist >= distance {
                report.boundary_in_accel = true;
            }

            cmds.push(AutoCmd::coast(
                (distance - accel_dist).max(0.0) / max_vel + safety_margin_s
            ));
        }
        else if vel == 0.0 {
            // Coasting at zero velocity never reaches the boundary
            warn!(
                "Stationary with no acceleration available, holding for {:.3} s", 
                self.params.stationary_hold_s
            );
            report.stationary_hold = true;
            cmds.push(AutoCmd::hold(self.params.stationary_hold_s));
        }
        else {
            report.coasting = true;
            cmds.push(AutoCmd::coast(distance / vel + safety_margin_s));
        }

        debug!("AutoCtrl planned {} commands: {:?}", cmds.len(), cmds);

        Ok((cmds, report))
    }
}

impl State for AutoCtrl {
    type InitData = &'static str;
    type InitError = AutoCtrlError;

    type InputData = InputData;
    type OutputData = Vec<AutoCmd>;
    type StatusReport = StatusReport;
    type ProcError = AutoCtrlError;

    /// Initialise the AutoCtrl module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session) 
        -> Result<(), Self::InitError> 
    {
        self.params = params::load(init_data)
            .map_err(AutoCtrlError::ParamLoadError)?;
        self.params.validate()?;

        // Keep a copy of the parameters used with the session
        match toml::to_string(&self.params) {
            Ok(s) => session.save_text("auto_ctrl/params.toml", &s),
            Err(e) => warn!("Couldn't serialise the AutoCtrl parameters: {}", e)
        }

        Ok(())
    }

    /// Plan the commands for the current section.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Clear the status report
        self.report = StatusReport::default();

        let (cmds, report) = self.plan_actions(
            input_data.car.as_ref(), 
            input_data.road.as_ref(), 
            input_data.safety_margin_s
        )?;

        self.report = report;

        Ok((cmds, report))
    }
}
