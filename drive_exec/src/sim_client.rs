//! # Simulation Client
//!
//! The SimClient is an in-process vehicle state provider, to be used for testing and development
//! of the driver rather than for an actual run. It simulates:
//!
//! - A course made up of zones with fixed speed limits, three of which are built in.
//! - Constant acceleration vehicle motion, which stops at zero velocity when braking and can only
//!   accelerate while the ignition is on.
//! - The worst overspeed of the vehicle relative to the zone it's in.
//!
//! Simulated time is taken from a `Clock`, with the vehicle state being brought up to the clock's
//! current time on every request. Using a `VirtualClock` shared with the driver allows a whole run
//! to be made instantly. Each request can be given a latency, which is slept on the clock before
//! the request is handled, to mimic a remote provider.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info};
use std::time::Duration;

use crate::car_client::{CarClientError, CarService, Clock};
use comms_if::eqpt::{
    car::{Car, CarAction, CarActionType, Engine, Ignition, Token, TokenRequest},
    road::{Road, SpeedLimit, SpeedLimitAhead},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Distance before a boundary at which the vehicle is considered to have crossed it.
///
/// Units: meters
const BOUNDARY_TOLERANCE_M: f64 = 1e-4;

/// Velocity under which a braking vehicle is considered stopped.
///
/// Units: meters/second
const STOP_TOLERANCE_MS: f64 = 1e-6;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct SimClient<C: Clock> {
    clock: C,

    course: Option<Course>,

    token: Option<Token>,

    latency: Duration,

    state: SimState,
}

/// An ordered list of zones, the first starting at the vehicle's start position.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub zones: Vec<Zone>,
}

/// A stretch of road with fixed speed limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    /// Units: meters/second
    pub min: f64,

    /// Units: meters/second
    pub max: f64,

    /// Units: meters
    pub length_m: f64,
}

#[derive(Debug, Clone, Default)]
struct SimState {
    position_m: f64,

    vel_ms: f64,

    /// Demanded acceleration, only applied in full while the ignition is on
    accel_ms2: f64,

    ignition: Ignition,

    start_time_s: f64,

    last_update_s: f64,

    max_overspeed_ms: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Course {
    /// Get one of the built in course layouts, numbered from 1.
    pub fn builtin(layout: u8) -> Option<Self> {
        let zones: &[(f64, f64, f64)] = match layout {
            1 => &[
                (20.0, 24.0, 200.0),
                (30.0, 40.0, 300.0),
                (10.0, 12.0, 150.0),
                (20.0, 30.0, 250.0),
            ],
            2 => &[
                (20.0, 24.0, 150.0),
                (0.0, 0.0, 60.0),
                (20.0, 30.0, 300.0),
                (10.0, 18.0, 200.0),
            ],
            3 => &[
                (10.0, 12.0, 100.0),
                (30.0, 36.0, 400.0),
                (20.0, 24.0, 120.0),
                (0.0, 0.0, 60.0),
                (30.0, 40.0, 500.0),
                (15.0, 20.0, 200.0),
            ],
            _ => return None,
        };

        Some(Self {
            zones: zones
                .iter()
                .map(|&(min, max, length_m)| Zone { min, max, length_m })
                .collect(),
        })
    }

    /// Total length of the course.
    ///
    /// Units: meters
    pub fn length_m(&self) -> f64 {
        self.zones.iter().map(|z| z.length_m).sum()
    }

    /// Get the index of the zone at the given position and the position of the end of that zone.
    ///
    /// Positions beyond the end of the course are in the final zone.
    fn zone_at(&self, position_m: f64) -> (usize, f64) {
        let mut end_m = 0.0;

        for (i, zone) in self.zones.iter().enumerate() {
            end_m += zone.length_m;
            if position_m < end_m - BOUNDARY_TOLERANCE_M {
                return (i, end_m);
            }
        }

        (self.zones.len().saturating_sub(1), end_m)
    }
}

impl<C: Clock> SimClient<C> {
    /// Create a new client using the given clock for simulated time.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            course: None,
            token: None,
            latency: Duration::from_secs(0),
            state: SimState::default(),
        }
    }

    /// Create a new client which drives a custom course rather than a built in one.
    ///
    /// A run must still be registered before use, the course layout in the request is ignored.
    /// Registering fails if the course has no zones.
    pub fn with_course(clock: C, course: Course) -> Self {
        Self {
            clock,
            course: Some(course),
            token: None,
            latency: Duration::from_secs(0),
            state: SimState::default(),
        }
    }

    /// Set the time each request takes.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Distance travelled since the run was registered.
    ///
    /// Units: meters
    pub fn position_m(&self) -> f64 {
        self.state.position_m
    }

    /// The largest amount by which the vehicle has exceeded the limit of the zone it was in.
    ///
    /// Units: meters/second
    pub fn max_overspeed_ms(&self) -> f64 {
        self.state.max_overspeed_ms
    }

    /// The course being driven, if registered.
    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    /// Wait out the request latency then bring the vehicle up to the current time.
    fn update(&mut self) -> Result<(), CarClientError> {
        if self.latency > Duration::from_secs(0) {
            self.clock.sleep(self.latency);
        }

        let course = match (&self.course, &self.token) {
            (Some(c), Some(_)) => c,
            _ => return Err(CarClientError::NotRegistered),
        };

        let now_s = self.clock.now_s();
        let state = &mut self.state;
        let dt = now_s - state.last_update_s;

        if dt <= 0.0 {
            return Ok(());
        }
        state.last_update_s = now_s;

        let accel = match state.ignition {
            Ignition::On => state.accel_ms2,
            Ignition::Off => state.accel_ms2.min(0.0),
        };

        if accel < 0.0 && state.vel_ms + accel * dt <= STOP_TOLERANCE_MS {
            // Stops part way through the step and stays stopped
            let stop_s = (-state.vel_ms / accel).max(0.0);
            state.position_m += state.vel_ms * stop_s / 2.0;
            state.vel_ms = 0.0;
        } else {
            state.position_m += state.vel_ms * dt + 0.5 * accel * dt * dt;
            state.vel_ms += accel * dt;
        }

        let (zone_idx, _) = course.zone_at(state.position_m);
        if let Some(zone) = course.zones.get(zone_idx) {
            let overspeed = state.vel_ms - zone.max;
            if overspeed > state.max_overspeed_ms {
                state.max_overspeed_ms = overspeed;
            }
        }

        Ok(())
    }
}

impl<C: Clock> CarService for SimClient<C> {
    fn register(&mut self, request: &TokenRequest) -> Result<Token, CarClientError> {
        if self.latency > Duration::from_secs(0) {
            self.clock.sleep(self.latency);
        }

        if self.course.is_none() {
            self.course = Some(
                Course::builtin(request.course_layout)
                    .ok_or(CarClientError::UnknownCourse(request.course_layout))?,
            );
        }

        if self.course.as_ref().map_or(true, |c| c.zones.is_empty()) {
            return Err(CarClientError::EmptyCourse);
        }

        let now_s = self.clock.now_s();
        self.state = SimState {
            start_time_s: now_s,
            last_update_s: now_s,
            ..Default::default()
        };

        info!(
            "Sim run registered for {} on course {} ({:.1} m)",
            request.name,
            request.course_layout,
            self.course.as_ref().map(|c| c.length_m()).unwrap_or(0.0)
        );

        let token = Token(format!("sim-{}-{}", request.course_layout, request.name));
        self.token = Some(token.clone());

        Ok(token)
    }

    fn get_car(&mut self) -> Result<Car, CarClientError> {
        self.update()?;
        let state = &self.state;

        let engine_state = match (state.ignition, state.vel_ms == 0.0) {
            (Ignition::Off, _) => "Off",
            (Ignition::On, true) if state.accel_ms2 <= 0.0 => "Idling",
            (Ignition::On, _) if state.accel_ms2 > 0.0 => "Accelerating",
            (Ignition::On, _) if state.accel_ms2 < 0.0 => "Braking",
            (Ignition::On, _) => "Cruising",
        };

        Ok(Car {
            current_velocity: Some(state.vel_ms),
            engine: Some(Engine {
                state: engine_state.to_string(),
            }),
            ignition: state.ignition,
            total_distance_travelled: Some(state.position_m),
            total_time_travelled: Some(state.last_update_s - state.start_time_s),
        })
    }

    fn get_road(&mut self) -> Result<Road, CarClientError> {
        self.update()?;
        let course = self.course.as_ref().ok_or(CarClientError::NotRegistered)?;
        let (zone_idx, end_m) = course.zone_at(self.state.position_m);
        let zone = *course
            .zones
            .get(zone_idx)
            .ok_or(CarClientError::EmptyCourse)?;

        let speed_limit_ahead = match course.zones.get(zone_idx + 1) {
            Some(next) => SpeedLimitAhead {
                min: Some(next.min),
                max: Some(next.max),
                remaining_distance_to_enforcement: Some((end_m - self.state.position_m).max(0.0)),
            },
            None => SpeedLimitAhead::default(),
        };

        Ok(Road {
            current_speed_limit: SpeedLimit {
                min: Some(zone.min),
                max: Some(zone.max),
            },
            speed_limit_ahead,
        })
    }

    fn do_action(&mut self, action: CarAction) -> Result<(), CarClientError> {
        self.update()?;

        match (action.action, action.force) {
            (CarActionType::Accelerate, Some(f)) if f >= 0 => self.state.accel_ms2 = f as f64,
            (CarActionType::Brake, Some(f)) if f >= 0 => self.state.accel_ms2 = -(f as f64),
            (CarActionType::IgnitionOn, _) => self.state.ignition = Ignition::On,
            (CarActionType::IgnitionOff, _) => {
                self.state.ignition = Ignition::Off;
                self.state.accel_ms2 = 0.0;
            }
            _ => return Err(CarClientError::InvalidAction(action)),
        }

        debug!(
            "Sim action {:?} at {:.3} m, {:.3} m/s",
            action, self.state.position_m, self.state.vel_ms
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::car_client::VirtualClock;
    use std::time::Duration;

    fn registered(layout: u8) -> (SimClient<VirtualClock>, VirtualClock) {
        let clock = VirtualClock::new();
        let mut sim = SimClient::new(clock.clone());
        sim.register(&TokenRequest::new(layout, "test@test.com").unwrap())
            .unwrap();
        (sim, clock)
    }

    fn accel(force: i32) -> CarAction {
        CarAction {
            action: CarActionType::Accelerate,
            force: Some(force),
        }
    }

    fn brake(force: i32) -> CarAction {
        CarAction {
            action: CarActionType::Brake,
            force: Some(force),
        }
    }

    #[test]
    fn test_not_registered() {
        let mut sim = SimClient::new(VirtualClock::new());
        assert_eq!(sim.get_car(), Err(CarClientError::NotRegistered));
        assert_eq!(sim.get_road(), Err(CarClientError::NotRegistered));
    }

    #[test]
    fn test_unknown_course() {
        let mut sim = SimClient::new(VirtualClock::new());
        let request = TokenRequest {
            course_layout: 7,
            name: String::from("test@test.com"),
        };
        assert_eq!(
            sim.register(&request),
            Err(CarClientError::UnknownCourse(7))
        );
    }

    #[test]
    fn test_empty_course() {
        let mut sim = SimClient::with_course(VirtualClock::new(), Course { zones: Vec::new() });

        assert_eq!(
            sim.register(&TokenRequest::new(1, "test@test.com").unwrap()),
            Err(CarClientError::EmptyCourse)
        );
        assert_eq!(sim.get_road(), Err(CarClientError::NotRegistered));
        assert_eq!(sim.get_car(), Err(CarClientError::NotRegistered));
    }

    #[test]
    fn test_builtin_courses() {
        for layout in 1..=3 {
            let course = Course::builtin(layout).unwrap();
            assert!(course.zones.len() >= 4);
            // Stop zones must be long enough to stop in from the safe braking speed
            assert!(course.zones.iter().all(|z| z.max > 0.0 || z.length_m >= 50.0));
        }
        assert!(Course::builtin(0).is_none());
        assert!(Course::builtin(4).is_none());
    }

    #[test]
    fn test_initial_state() {
        let (mut sim, _) = registered(1);

        let car = sim.get_car().unwrap();
        assert_eq!(car.ignition, Ignition::Off);
        assert_eq!(car.velocity(), 0.0);

        let road = sim.get_road().unwrap();
        assert_eq!(road.current_speed_limit.max, Some(24.0));
        assert_eq!(road.speed_limit_ahead.max, Some(40.0));
        assert_eq!(road.speed_limit_ahead.remaining_distance_to_enforcement, Some(200.0));
    }

    #[test]
    fn test_ignition_gates_acceleration() {
        let (mut sim, clock) = registered(1);

        sim.do_action(accel(6)).unwrap();
        clock.sleep(Duration::from_secs(2));
        assert_eq!(sim.get_car().unwrap().velocity(), 0.0);

        sim.do_action(CarAction::ignition(true)).unwrap();
        sim.do_action(accel(6)).unwrap();
        clock.sleep(Duration::from_secs(2));
        assert_eq!(sim.get_car().unwrap().velocity(), 12.0);
    }

    #[test]
    fn test_motion() {
        let (mut sim, clock) = registered(1);

        sim.do_action(CarAction::ignition(true)).unwrap();
        sim.do_action(accel(6)).unwrap();
        clock.sleep(Duration::from_secs(4));

        let car = sim.get_car().unwrap();
        assert_eq!(car.velocity(), 24.0);
        assert_eq!(car.total_distance_travelled, Some(48.0));
        assert_eq!(car.engine.unwrap().state, "Accelerating");

        // Braking for longer than it takes to stop leaves the vehicle stopped
        sim.do_action(brake(6)).unwrap();
        clock.sleep(Duration::from_secs(10));

        let car = sim.get_car().unwrap();
        assert_eq!(car.velocity(), 0.0);
        assert_eq!(car.total_distance_travelled, Some(96.0));
        assert_eq!(car.total_time_travelled, Some(14.0));

        let road = sim.get_road().unwrap();
        assert_eq!(road.speed_limit_ahead.remaining_distance_to_enforcement, Some(104.0));
    }

    #[test]
    fn test_final_zone_and_overspeed() {
        let clock = VirtualClock::new();
        let course = Course {
            zones: vec![
                Zone { min: 0.0, max: 10.0, length_m: 20.0 },
                Zone { min: 0.0, max: 5.0, length_m: 100.0 },
            ],
        };
        let mut sim = SimClient::with_course(clock.clone(), course);
        sim.register(&TokenRequest::new(1, "test@test.com").unwrap())
            .unwrap();

        sim.do_action(CarAction::ignition(true)).unwrap();
        sim.do_action(accel(2)).unwrap();
        clock.sleep(Duration::from_secs(5));
        sim.do_action(accel(0)).unwrap();

        // 25 m in, so in the final zone at 10 m/s
        let road = sim.get_road().unwrap();
        assert_eq!(road.current_speed_limit.max, Some(5.0));
        assert!(!road.has_zone_ahead());
        assert_eq!(road.speed_limit_ahead.max, None);
        assert_eq!(sim.max_overspeed_ms(), 5.0);
    }

    #[test]
    fn test_latency() {
        let clock = VirtualClock::new();
        let mut sim = SimClient::new(clock.clone()).with_latency(Duration::from_millis(50));
        sim.register(&TokenRequest::new(1, "test@test.com").unwrap())
            .unwrap();
        sim.do_action(CarAction::ignition(true)).unwrap();
        sim.do_action(accel(6)).unwrap();

        // The accelerate lands 50 ms after the ignition, and the read takes a further 50 ms
        let car = sim.get_car().unwrap();
        assert!((clock.now_s() - 0.2).abs() < 1e-9);
        assert!((car.velocity() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_action() {
        let (mut sim, _) = registered(2);
        let action = CarAction {
            action: CarActionType::Brake,
            force: None,
        };
        assert_eq!(
            sim.do_action(action),
            Err(CarClientError::InvalidAction(action))
        );
        assert_eq!(
            sim.do_action(accel(-1)),
            Err(CarClientError::InvalidAction(accel(-1)))
        );
    }
}
