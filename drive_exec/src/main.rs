//! Main drive executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and parameters
//!     - Initialise AutoCtrl
//!     - Register a run with the state provider
//!     - Main loop, once per section:
//!         - Vehicle and road state acquisition
//!         - AutoCtrl planning
//!         - Timed replay of the planned commands
//!
//! # Usage
//!
//! ```text
//! drive_exec [--virtual-time] [course] [user-email] [latency-ms]
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::info;
use std::time::Duration;
use structopt::StructOpt;

// Internal
use comms_if::eqpt::car::{MAX_COURSE_LAYOUT, MIN_COURSE_LAYOUT};
use drive_lib::{
    auto_ctrl::AutoCtrl,
    car_client::{Clock, SystemClock, VirtualClock},
    driver::{DriveSummary, Driver},
    params::DriveExecParams,
    sim_client::SimClient,
};
use util::{
    logger::{logger_init_with_quiet, parse_level},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Log target of the simulation client, quietened when `quiet_sim` is set.
const SIM_LOG_TARGET: &str = "drive_lib::sim_client";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(
    name = "drive_exec",
    about = "Drives a course by planning timed acceleration and braking for each speed zone"
)]
struct Opt {
    /// Course layout to drive, 1, 2 or 3
    #[structopt(default_value = "1", parse(try_from_str = parse_course))]
    course: u8,

    /// Email identifying the run
    #[structopt(default_value = "test@test.com")]
    user_email: String,

    /// Milliseconds by which to compensate for latency in the state provider
    #[structopt(default_value = "50")]
    latency_ms: u64,

    /// Run against a virtual clock, completing the run as fast as possible
    #[structopt(long)]
    virtual_time: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("drive_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Parameters are needed to know the log level
    let exec_params: DriveExecParams = util::params::load("drive_exec.toml")
        .wrap_err("Could not load exec params")?;

    // Initialise logger
    let quiet_targets: &[&'static str] = match exec_params.quiet_sim {
        true => &[SIM_LOG_TARGET],
        false => &[],
    };
    logger_init_with_quiet(
        parse_level(&exec_params.log_level).wrap_err("Invalid log level")?,
        quiet_targets,
        &session,
    )
    .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Drive Executable\n");
    info!("Session directory: {:?}", session.session_root);
    info!("Options: {:?}\n", opt);

    // ---- INITIALISE MODULES ----

    let mut auto_ctrl = AutoCtrl::default();
    auto_ctrl
        .init("auto_ctrl.toml", &session)
        .wrap_err("Failed to initialise AutoCtrl")?;
    info!("AutoCtrl init complete");

    // ---- DRIVE ----

    let safety_margin_s = util::time::millis_to_seconds(opt.latency_ms);

    let summary = match opt.virtual_time {
        true => run(VirtualClock::new(), &opt, &exec_params, auto_ctrl, safety_margin_s)?,
        false => run(SystemClock::new(), &opt, &exec_params, auto_ctrl, safety_margin_s)?,
    };

    info!(
        "Drove {:?} m in {:.3} s, {} sections, {} actions, longest refresh {:.0} ms",
        summary.final_car.total_distance_travelled,
        summary.elapsed_s,
        summary.num_sections,
        summary.num_actions,
        summary.max_refresh_s * 1000.0
    );

    Ok(())
}

/// Drive the selected course on the simulation client using the given clock.
fn run<C: Clock + Clone>(
    clock: C,
    opt: &Opt,
    exec_params: &DriveExecParams,
    auto_ctrl: AutoCtrl,
    safety_margin_s: f64,
) -> Result<DriveSummary, Report> {
    let sim = SimClient::new(clock.clone())
        .with_latency(Duration::from_millis(exec_params.sim_latency_ms));

    let mut driver = Driver::new(sim, clock, auto_ctrl, exec_params.max_sections);

    let summary = driver
        .start_driving(opt.course, &opt.user_email, safety_margin_s)
        .wrap_err("Failed to complete the run")?;

    info!(
        "Worst overspeed: {:.3} m/s",
        driver.service().max_overspeed_ms()
    );

    Ok(summary)
}

/// Parse the course layout argument, which must be a known layout.
fn parse_course(s: &str) -> Result<u8, String> {
    let course: u8 = s.parse().map_err(|e| format!("{}", e))?;

    if !(MIN_COURSE_LAYOUT..=MAX_COURSE_LAYOUT).contains(&course) {
        return Err(format!(
            "course must be between {} and {}",
            MIN_COURSE_LAYOUT, MAX_COURSE_LAYOUT
        ));
    }

    Ok(course)
}
