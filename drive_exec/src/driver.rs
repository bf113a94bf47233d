//! # Driver
//!
//! The execution loop. The driver registers a run with the state provider, switches the ignition
//! on, then repeatedly fetches the vehicle and road state, plans the commands for the section
//! ahead with AutoCtrl, and replays them open loop against the provider, waiting each command's
//! delay on the clock before issuing it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Duration;

use log::{debug, info, warn};

use crate::{
    auto_ctrl::{replay, AutoCtrl, AutoCtrlError, InputData},
    car_client::{CarClientError, CarService, Clock},
};
use comms_if::eqpt::car::{Car, CarAction, CarIfError, Token, TokenRequest};
use util::module::State;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct Driver<S: CarService, C: Clock> {
    service: S,

    clock: C,

    auto_ctrl: AutoCtrl,

    max_sections: u64,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct DriveSummary {
    /// Token of the registered run
    pub token: Token,

    /// Number of sections planned and executed
    pub num_sections: u64,

    /// Number of actions sent to the provider, excluding the initial ignition
    pub num_actions: u64,

    /// Vehicle state at the end of the run
    pub final_car: Car,

    /// Time from switching the ignition on to the end of the run.
    ///
    /// Units: seconds
    pub elapsed_s: f64,

    /// Longest time taken to refresh the car and road state after a section.
    ///
    /// Units: seconds
    pub max_refresh_s: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("Invalid run request: {0}")]
    InvalidRequest(#[from] CarIfError),

    #[error("State provider error: {0}")]
    CarClientError(#[from] CarClientError),

    #[error("AutoCtrl error: {0}")]
    AutoCtrlError(#[from] AutoCtrlError),

    #[error("The run did not complete within {0} sections")]
    TooManySections(u64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: CarService, C: Clock> Driver<S, C> {
    /// Create a new driver.
    ///
    /// `max_sections` bounds the number of sections in one run, so a run which never completes is
    /// reported as an error rather than looping forever.
    pub fn new(service: S, clock: C, auto_ctrl: AutoCtrl, max_sections: u64) -> Self {
        Self {
            service,
            clock,
            auto_ctrl,
            max_sections,
        }
    }

    /// The state provider used by the driver.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Drive the given course until the end of the road.
    ///
    /// # Inputs
    /// - `course`: Course layout to register the run on.
    /// - `user`: Identifier of the user making the run.
    /// - `safety_margin_s`: Latency compensation passed to AutoCtrl.
    pub fn start_driving(
        &mut self,
        course: u8,
        user: &str,
        safety_margin_s: f64,
    ) -> Result<DriveSummary, DriverError> {
        let request = TokenRequest::new(course, user)?;
        let token = self.service.register(&request)?;
        info!("Registered run {} on course {}", token.0, course);

        self.service.get_car()?;
        let start_s = self.clock.now_s();
        self.service.do_action(CarAction::ignition(true))?;

        let mut car = self.service.get_car()?;
        let mut road = self.service.get_road()?;

        let mut num_sections = 0;
        let mut num_actions = 0;
        let mut max_refresh_s: f64 = 0.0;

        while car.is_on() || road.has_zone_ahead() {
            if num_sections >= self.max_sections {
                return Err(DriverError::TooManySections(self.max_sections));
            }

            info!(
                "Section: {}, velocity: {:?}, limit: {:?}, limit ahead: {:?}, distance: {:?}",
                num_sections,
                car.current_velocity,
                road.current_speed_limit.max,
                road.speed_limit_ahead.max,
                road.speed_limit_ahead.remaining_distance_to_enforcement
            );

            let vel = car.velocity();
            let input = InputData {
                car: Some(car),
                road: Some(road),
                safety_margin_s,
            };
            let (cmds, report) = self.auto_ctrl.proc(&input)?;

            let predicted = replay::simulate(vel, &cmds);
            debug!(
                "Plan status: {:?}, predicted {:.3} m over {:.3} s ending at {:.3} m/s",
                report, predicted.distance_m, predicted.duration_s, predicted.final_vel_ms
            );

            for cmd in cmds {
                self.clock.sleep(delay_to_duration(cmd.delay_s));

                if !cmd.is_issued() {
                    continue;
                }

                info!(
                    "Taking action: {:?} with force {:?}",
                    cmd.cmd_type, cmd.force
                );
                self.service.do_action(cmd.to_car_action())?;
                num_actions += 1;
            }

            let refresh_start_s = self.clock.now_s();
            car = self.service.get_car()?;
            road = self.service.get_road()?;

            let refresh_s = self.clock.now_s() - refresh_start_s;
            max_refresh_s = max_refresh_s.max(refresh_s);
            info!(
                "Refreshing the car and road took {:.0} ms",
                refresh_s * 1000.0
            );

            num_sections += 1;
        }

        let elapsed_s = self.clock.now_s() - start_s;
        info!(
            "Run complete after {} sections, {:?} m in {:.3} s",
            num_sections, car.total_distance_travelled, elapsed_s
        );

        Ok(DriveSummary {
            token,
            num_sections,
            num_actions,
            final_car: car,
            elapsed_s,
            max_refresh_s,
        })
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Convert a planned delay into a duration which can be waited.
///
/// Negative and non-finite delays cannot be waited, so they are replaced with no wait at all.
pub fn delay_to_duration(delay_s: f64) -> Duration {
    match Duration::try_from_secs_f64(delay_s) {
        Ok(d) => d,
        Err(_) => {
            warn!("Cannot wait for a delay of {} s, continuing immediately", delay_s);
            Duration::ZERO
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        auto_ctrl::Params,
        car_client::VirtualClock,
        sim_client::{Course, SimClient},
    };

    fn driver(
        latency: Duration,
        max_sections: u64,
    ) -> Driver<SimClient<VirtualClock>, VirtualClock> {
        let clock = VirtualClock::new();
        let sim = SimClient::new(clock.clone()).with_latency(latency);

        Driver::new(
            sim,
            clock,
            AutoCtrl::from_params(Params::default()).unwrap(),
            max_sections,
        )
    }

    fn check_complete(
        driver: &Driver<SimClient<VirtualClock>, VirtualClock>,
        summary: &DriveSummary,
        course: u8,
    ) {
        let course = Course::builtin(course).unwrap();
        let final_zone_start = course.length_m() - course.zones.last().unwrap().length_m;

        assert!(!summary.final_car.is_on());
        assert_eq!(summary.final_car.velocity(), 0.0);

        // Stopped somewhere in the final zone
        let position = driver.service().position_m();
        assert!(position > final_zone_start, "Stopped at {}", position);
        assert!(position < course.length_m(), "Stopped at {}", position);
    }

    #[test]
    fn test_delay_to_duration() {
        assert_eq!(delay_to_duration(1.5), Duration::from_millis(1500));
        assert_eq!(delay_to_duration(0.0), Duration::ZERO);
        assert_eq!(delay_to_duration(-3.0), Duration::ZERO);
        assert_eq!(delay_to_duration(std::f64::NAN), Duration::ZERO);
        assert_eq!(delay_to_duration(std::f64::INFINITY), Duration::ZERO);
    }

    #[test]
    fn test_drive_all_courses() {
        for course in 1..=3 {
            let mut driver = driver(Duration::ZERO, 100);
            let summary = driver.start_driving(course, "test@test.com", 0.0).unwrap();

            check_complete(&driver, &summary, course);
            assert_eq!(summary.token.0, format!("sim-{}-test@test.com", course));
            assert!(summary.num_sections >= 4);
        }
    }

    #[test]
    fn test_drive_with_latency() {
        for course in 1..=3 {
            let mut driver = driver(Duration::from_millis(50), 100);
            let summary = driver.start_driving(course, "test@test.com", 0.05).unwrap();

            check_complete(&driver, &summary, course);

            // Each refresh is two requests
            assert!((summary.max_refresh_s - 0.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_refresh_time_without_latency() {
        let mut driver = driver(Duration::ZERO, 100);
        let summary = driver.start_driving(1, "test@test.com", 0.0).unwrap();

        assert_eq!(summary.max_refresh_s, 0.0);
    }

    #[test]
    fn test_course_1_within_limits() {
        // Course 1 has no stop zones, so with no latency the vehicle never exceeds a limit
        let mut driver = driver(Duration::ZERO, 100);
        driver.start_driving(1, "test@test.com", 0.0).unwrap();

        assert!(driver.service().max_overspeed_ms() < 1e-6);
    }

    #[test]
    fn test_too_many_sections() {
        let mut driver = driver(Duration::ZERO, 2);

        assert!(matches!(
            driver.start_driving(1, "test@test.com", 0.0),
            Err(DriverError::TooManySections(2))
        ));
    }

    #[test]
    fn test_invalid_course() {
        let mut driver = driver(Duration::ZERO, 100);

        assert!(matches!(
            driver.start_driving(5, "test@test.com", 0.0),
            Err(DriverError::InvalidRequest(CarIfError::InvalidCourseLayout(5)))
        ));
    }
}
