//! Main controller executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Pose telemetry acquisition
//!         - Safe mode management
//!         - Waypoint control processing
//!         - Velocity command publication
//!         - Telemetry publication
//!
//! # Modules
//!
//! All modules (e.g. `wp_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use ctrl_lib::{
    cmd_server::CmdServer,
    data_store::{DataStore, SafeModeCause},
    params::CtrlExecParams,
    pose_client::{PoseClient, PoseClientError},
    tm_server::TmServer,
    wp_ctrl::WpCtrlMode,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use comms_if::{eqpt::agent::VelCmd, net::NetParams};
use log::{info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    raise_error,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Limit on the number of consecutive cycle overruns before the executable is
/// considered unable to keep the control rate and is stopped.
const MAX_CONSEC_CYCLE_OVERRUNS: u64 = 500;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("ctrl_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Waypoint Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: CtrlExecParams =
        util::params::load("exec.toml").wrap_err("Could not load exec params")?;

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;

    info!("Exec parameters loaded");

    if exec_params.cycle_period_s <= 0.0 {
        raise_error!(
            "Cycle period must be positive, got {} s",
            exec_params.cycle_period_s
        );
    }

    let cycle_frequency_hz = 1.0 / exec_params.cycle_period_s;

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.wp_ctrl
        .init("wp_ctrl.toml", &session)
        .wrap_err("Failed to initialise WpCtrl")?;
    info!("WpCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let zmq_ctx = comms_if::net::zmq::Context::new();

    let pose_client = {
        let c = PoseClient::new(&zmq_ctx, &net_params)
            .wrap_err("Failed to initialise the PoseClient")?;
        info!("PoseClient initialised");
        c
    };

    let mut cmd_server = {
        let s = CmdServer::new(&zmq_ctx, &net_params)
            .wrap_err("Failed to initialise the CmdServer")?;
        info!("CmdServer initialised");
        s
    };

    let mut tm_server = {
        let s = TmServer::new(&zmq_ctx, &net_params)
            .wrap_err("Failed to initialise the TmServer")?;
        info!("TmServer initialised");
        s
    };

    info!("Network initialisation complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(cycle_frequency_hz);

        // ---- DATA INPUT ----

        // If the pose source is connected clear any safe mode, otherwise make safe, since
        // without feedback the controller's belief cannot be trusted.
        if pose_client.is_connected() {
            ds.make_unsafe(SafeModeCause::PoseTmNotConnected).ok();
        } else {
            ds.make_safe(SafeModeCause::PoseTmNotConnected);
        }

        // Drain pending pose telemetry, keeping the freshest
        loop {
            match pose_client.recv_pose() {
                Ok(Some(pose_tm)) => ds.wp_ctrl_input.pose_tm = Some(pose_tm),
                Ok(None) => break,
                Err(PoseClientError::NotConnected) => {
                    ds.make_safe(SafeModeCause::PoseTmNotConnected);
                    break;
                }
                // Malformed poses are dropped, the last good belief stands
                Err(PoseClientError::PoseParseError(e)) => {
                    warn!("Could not parse recieved pose: {}", e);
                    continue;
                }
                Err(e) => {
                    return Err(e).wrap_err("An error occured while receiving pose telemetry")
                }
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        // WpCtrl processing. While safe the controller is not ticked, so that it does not act
        // on a stale belief.
        if !ds.safe {
            match ds.wp_ctrl.proc(&ds.wp_ctrl_input) {
                Ok((o, r)) => {
                    ds.wp_ctrl_output = o;
                    ds.wp_ctrl_status_rpt = r;
                }
                Err(e) => warn!("Error during WpCtrl processing: {}", e),
            }
        }

        // ---- COMMAND PUBLICATION ----

        // While safe a zero command is substituted for the controller output, a stale bang-bang
        // demand would drive the agent away from the setpoint.
        let vel_cmd = match ds.safe {
            true => Some(VelCmd::default()),
            false => ds.wp_ctrl_output,
        };

        if let Some(ref cmd) = vel_cmd {
            match cmd_server.send(cmd) {
                Ok(_) => (),
                Err(e) => warn!("CmdServer error: {}", e),
            }
        }

        // ---- TELEMETRY ----

        match tm_server.send(&ds) {
            Ok(_) => (),
            Err(e) => warn!("TmServer error: {}", e),
        };

        // Log progress on the 1Hz
        if ds.is_1_hz_cycle {
            match ds.wp_ctrl.mode() {
                WpCtrlMode::Follow => info!(
                    "Following: {:.2} m to setpoint, {} waypoint(s) remaining",
                    ds.wp_ctrl_status_rpt.dist_to_setpoint_m,
                    ds.wp_ctrl_status_rpt.waypoints_remaining
                ),
                mode => info!("{:?}", mode),
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(exec_params.cycle_period_s).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - exec_params.cycle_period_s
                );
                ds.num_consec_cycle_overruns += 1;

                // An executable which persistently cannot keep the control rate must not keep
                // driving the agent
                if ds.num_consec_cycle_overruns > MAX_CONSEC_CYCLE_OVERRUNS {
                    raise_error!(
                        "More than {} consecutive cycle overruns",
                        MAX_CONSEC_CYCLE_OVERRUNS
                    );
                }
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }
}
