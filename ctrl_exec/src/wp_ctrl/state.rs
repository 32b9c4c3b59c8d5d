//! Implementations for the WpCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Serialize;

// Internal
use super::{Mission, MissionError, Params, WpCtrlError, AXIS_SPEED_MS};
use crate::loc::Pose;
use comms_if::eqpt::agent::{PoseTm, VelCmd};
use util::{maths::norm, module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Waypoint control module state
#[derive(Default)]
pub struct WpCtrl {
    params: Params,

    /// Executing mode
    mode: WpCtrlMode,

    /// Belief of the agent's pose, written only from received telemetry.
    current_pose: Option<Pose>,

    /// The setpoint the agent is currently driven toward.
    setpoint: Option<Pose>,

    /// The waypoints still to be visited.
    mission: Mission,

    report: StatusReport,
    output: Option<VelCmd>,
}

/// Input data to waypoint control.
#[derive(Default)]
pub struct InputData {
    /// The most recent pose telemetry received this cycle, or `None` if no
    /// new pose arrived.
    pub pose_tm: Option<PoseTm>,
}

/// Status report for WpCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Error between the setpoint and the pose belief along the X axis
    pub x_diff_m: f64,

    /// Error between the setpoint and the pose belief along the Y axis
    pub y_diff_m: f64,

    /// Straight-line distance between the pose belief and the setpoint
    pub dist_to_setpoint_m: f64,

    /// True if the agent arrived at the setpoint this cycle
    pub arrived: bool,

    /// Number of waypoints still queued
    pub waypoints_remaining: usize,

    /// True if the mission is complete
    pub mission_complete: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The possible modes of execution of WpCtrl.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum WpCtrlMode {
    /// No pose has ever been received, the module must not emit commands.
    AwaitPose,

    /// A setpoint is active and the agent is being driven toward it.
    Follow,

    /// All required waypoints have been visited. Terminal, no commands are
    /// emitted.
    MissionComplete,
}

impl Default for WpCtrlMode {
    fn default() -> Self {
        WpCtrlMode::AwaitPose
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for WpCtrl {
    type InitData = &'static str;
    type InitError = params::LoadError;

    type InputData = InputData;
    type OutputData = Option<VelCmd>;
    type StatusReport = StatusReport;
    type ProcError = WpCtrlError;

    /// Initialise the WpCtrl module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        // Load the parameters
        self.params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(e),
        };

        // Snapshot the as-loaded parameters into the session directory
        session.save("wp_ctrl_params.json", self.params.clone());

        // Load the mission
        self.mission = Mission::from_offsets(&self.params.mission_offsets_m);
        self.mode = WpCtrlMode::AwaitPose;

        Ok(())
    }

    /// Process waypoint control.
    ///
    /// Processing involves:
    ///  1. Applying any pose telemetry received this cycle (the first pose
    ///     establishes the first setpoint).
    ///  2. Comparing the pose belief against the setpoint and emitting either
    ///     a bang-bang velocity command or, on arrival, a stop command
    ///     followed by an advance to the next waypoint.
    fn proc(&mut self, input: &InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Setup cycle data
        self.output = None;
        self.report = StatusReport::default();

        // Pose telemetry is applied before the tick decision so that the
        // decision uses the freshest belief available
        if let Some(ref pose_tm) = input.pose_tm {
            self.handle_pose_tm(pose_tm);
        }

        // Mode execution
        match self.mode {
            WpCtrlMode::AwaitPose => self.mode_await_pose(),
            WpCtrlMode::Follow => self.mode_follow()?,
            WpCtrlMode::MissionComplete => (),
        }

        self.report.waypoints_remaining = self.mission.len();
        self.report.mission_complete = self.mode == WpCtrlMode::MissionComplete;

        Ok((self.output, self.report))
    }
}

impl WpCtrl {
    /// Get the current executing mode.
    pub fn mode(&self) -> WpCtrlMode {
        self.mode
    }

    /// Get the current pose belief, `None` if no telemetry has been received.
    pub fn current_pose(&self) -> Option<Pose> {
        self.current_pose
    }

    /// Get the active setpoint, `None` if the mission hasn't started.
    pub fn setpoint(&self) -> Option<Pose> {
        self.setpoint
    }

    /// Apply a received pose telemetry message.
    ///
    /// Telemetry is the only writer of the pose belief. The first message
    /// received also performs the initial advance, establishing the first
    /// setpoint from the agent's starting position.
    fn handle_pose_tm(&mut self, pose_tm: &PoseTm) {
        let pose = Pose::from(*pose_tm);
        self.current_pose = Some(pose);

        if self.setpoint.is_none() && self.mode != WpCtrlMode::MissionComplete {
            info!(
                "First pose received ({:.2}, {:.2}), starting mission",
                pose.position_m[0], pose.position_m[1]
            );
            self.advance(pose);
        }
    }

    /// Mode awaiting first pose.
    ///
    /// No command may be emitted before the agent's position is known.
    fn mode_await_pose(&mut self) {
        debug!("Waiting for first pose from the agent");
    }

    /// Mode following the active setpoint.
    ///
    /// Emits a bang-bang command toward the setpoint, or a stop command and
    /// a mission advance once the setpoint is reached on both axes.
    fn mode_follow(&mut self) -> Result<(), WpCtrlError> {
        // Validate pose
        let pose = match self.current_pose {
            Some(p) => p,
            None => return Err(WpCtrlError::NoPose),
        };

        // Validate setpoint
        let setpoint = match self.setpoint {
            Some(s) => s,
            None => return Err(WpCtrlError::NoSetpoint),
        };

        let x_diff_m = setpoint.position_m[0] - pose.position_m[0];
        let y_diff_m = setpoint.position_m[1] - pose.position_m[1];

        self.report.x_diff_m = x_diff_m;
        self.report.y_diff_m = y_diff_m;

        // The unwrap here is safe since both points are 2D
        self.report.dist_to_setpoint_m = norm(
            &[pose.position_m[0], pose.position_m[1]],
            &[setpoint.position_m[0], setpoint.position_m[1]],
        )
        .unwrap();

        if pose.is_at(&setpoint, self.params.position_tol_m) {
            // Arrived, command a stop and move on to the next waypoint
            self.report.arrived = true;
            self.output = Some(VelCmd::default());

            info!(
                "Arrived at setpoint ({:.2}, {:.2})",
                setpoint.position_m[0], setpoint.position_m[1]
            );

            if self.params.single_shot {
                info!("Single shot mission, stopping at the first waypoint");
                self.mode = WpCtrlMode::MissionComplete;
            } else {
                self.advance(setpoint);
            }
        } else {
            self.output = Some(VelCmd {
                lin_x_ms: bang_bang_axis(x_diff_m, self.params.position_tol_m),
                lin_y_ms: bang_bang_axis(y_diff_m, self.params.position_tol_m),
                ang_rads: 0.0,
            });
        }

        Ok(())
    }

    /// Advance the mission to the next waypoint.
    ///
    /// The new setpoint is the next queued offset applied to `anchor`, which
    /// is the setpoint just reached, or the agent's own pose for the first
    /// waypoint of the mission. The pose belief is never written here, it
    /// comes exclusively from telemetry. An exhausted mission is the end of
    /// the mission, not a fault.
    fn advance(&mut self, anchor: Pose) {
        match self.mission.dequeue() {
            Ok(offset_m) => {
                let setpoint = anchor.offset_by(offset_m);

                info!(
                    "Driving to setpoint ({:.2}, {:.2}), {} waypoint(s) remaining",
                    setpoint.position_m[0],
                    setpoint.position_m[1],
                    self.mission.len()
                );

                self.setpoint = Some(setpoint);
                self.mode = WpCtrlMode::Follow;
            }
            Err(MissionError::Empty) => {
                info!("All waypoints visited, mission complete");
                self.mode = WpCtrlMode::MissionComplete;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Bang-bang demand for a single axis.
///
/// The demand has a fixed magnitude, it is never proportional to the error.
/// Errors within the tolerance produce no demand.
fn bang_bang_axis(diff_m: f64, tol_m: f64) -> f64 {
    if diff_m > tol_m {
        AXIS_SPEED_MS
    } else if diff_m < -tol_m {
        -AXIS_SPEED_MS
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use util::module::State;

    /// Build a controller as `init` would, without touching the filesystem.
    fn wp_ctrl(offsets_m: &[[f64; 2]], single_shot: bool) -> WpCtrl {
        WpCtrl {
            params: Params {
                position_tol_m: 0.1,
                single_shot,
                mission_offsets_m: offsets_m.to_vec(),
            },
            mission: Mission::from_offsets(offsets_m),
            ..Default::default()
        }
    }

    fn pose_tm(x_m: f64, y_m: f64) -> InputData {
        InputData {
            pose_tm: Some(PoseTm {
                x_m,
                y_m,
                heading_rad: 0.0,
            }),
        }
    }

    #[test]
    fn test_bang_bang_axis() {
        assert_eq!(bang_bang_axis(1.0, 0.1), 1.0);
        assert_eq!(bang_bang_axis(-1.0, 0.1), -1.0);
        assert_eq!(bang_bang_axis(0.05, 0.1), 0.0);
        assert_eq!(bang_bang_axis(-0.05, 0.1), 0.0);

        // Exactly the tolerance is treated as arrived, so no demand
        assert_eq!(bang_bang_axis(0.1, 0.1), 0.0);
        assert_eq!(bang_bang_axis(-0.1, 0.1), 0.0);
    }

    #[test]
    fn test_no_cmd_before_first_pose() {
        let mut ctrl = wp_ctrl(&[[0.0, 0.5]], false);

        // Ticks without any pose telemetry must not produce a command
        for _ in 0..5 {
            let (output, report) = ctrl.proc(&InputData::default()).unwrap();
            assert!(output.is_none());
            assert!(!report.mission_complete);
        }

        assert_eq!(ctrl.mode(), WpCtrlMode::AwaitPose);
    }

    #[test]
    fn test_follow_and_arrive() {
        let mut ctrl = wp_ctrl(&[[1.0, 0.0]], false);

        // First pose establishes the setpoint and drives +X
        let (output, _) = ctrl.proc(&pose_tm(0.0, 0.0)).unwrap();
        let cmd = output.unwrap();
        assert_eq!(cmd.lin_x_ms, 1.0);
        assert_eq!(cmd.lin_y_ms, 0.0);
        assert_eq!(ctrl.setpoint().unwrap().position_m[0], 1.0);

        // Within tolerance of the setpoint: stop command, mission exhausted
        let (output, report) = ctrl.proc(&pose_tm(0.95, 0.0)).unwrap();
        let cmd = output.unwrap();
        assert_eq!(cmd.lin_x_ms, 0.0);
        assert_eq!(cmd.lin_y_ms, 0.0);
        assert!(report.arrived);
        assert!(report.mission_complete);

        // Terminal, no further commands
        let (output, report) = ctrl.proc(&pose_tm(0.99, 0.0)).unwrap();
        assert!(output.is_none());
        assert!(report.mission_complete);
    }

    #[test]
    fn test_full_mission() {
        let mut ctrl = wp_ctrl(&[[0.0, 0.5], [0.5, 0.0]], false);

        // First pose at the origin, first setpoint is (0, 0.5)
        let (output, _) = ctrl.proc(&pose_tm(0.0, 0.0)).unwrap();
        let cmd = output.unwrap();
        assert_eq!(cmd.lin_x_ms, 0.0);
        assert_eq!(cmd.lin_y_ms, 1.0);

        let setpoint = ctrl.setpoint().unwrap();
        assert_eq!(setpoint.position_m[0], 0.0);
        assert_eq!(setpoint.position_m[1], 0.5);

        // Feedback short of the waypoint keeps driving +Y
        let (output, report) = ctrl.proc(&pose_tm(0.0, 0.3)).unwrap();
        assert_eq!(output.unwrap().lin_y_ms, 1.0);
        assert!(!report.arrived);

        // Feedback at y = 0.4 is within tolerance: stop, advance to the
        // second waypoint which chains from the first setpoint
        let (output, report) = ctrl.proc(&pose_tm(0.0, 0.4)).unwrap();
        let cmd = output.unwrap();
        assert_eq!(cmd.lin_x_ms, 0.0);
        assert_eq!(cmd.lin_y_ms, 0.0);
        assert!(report.arrived);
        assert_eq!(report.waypoints_remaining, 0);
        assert!(!report.mission_complete);

        let setpoint = ctrl.setpoint().unwrap();
        assert_eq!(setpoint.position_m[0], 0.5);
        assert_eq!(setpoint.position_m[1], 0.5);

        // Next tick drives +X toward the new setpoint
        let (output, _) = ctrl.proc(&InputData::default()).unwrap();
        let cmd = output.unwrap();
        assert_eq!(cmd.lin_x_ms, 1.0);
        assert_eq!(cmd.lin_y_ms, 0.0);

        // Arriving at the final waypoint completes the mission
        let (output, report) = ctrl.proc(&pose_tm(0.45, 0.45)).unwrap();
        assert!(report.arrived);
        assert!(report.mission_complete);
        assert!(output.is_some());

        let (output, _) = ctrl.proc(&InputData::default()).unwrap();
        assert!(output.is_none());
    }

    #[test]
    fn test_negative_axis_demands() {
        let mut ctrl = wp_ctrl(&[[-1.0, -0.5]], false);

        let (output, _) = ctrl.proc(&pose_tm(0.0, 0.0)).unwrap();
        let cmd = output.unwrap();
        assert_eq!(cmd.lin_x_ms, -1.0);
        assert_eq!(cmd.lin_y_ms, -1.0);
    }

    #[test]
    fn test_single_shot_stops_with_waypoints_queued() {
        let mut ctrl = wp_ctrl(&[[0.0, 0.5], [0.5, 0.0], [0.0, 1.0]], true);

        ctrl.proc(&pose_tm(0.0, 0.0)).unwrap();

        // Arrive at the first waypoint
        let (output, report) = ctrl.proc(&pose_tm(0.0, 0.45)).unwrap();
        assert!(output.is_some());
        assert!(report.arrived);
        assert!(report.mission_complete);

        // The remaining waypoints are never visited
        assert_eq!(report.waypoints_remaining, 2);
        assert_eq!(ctrl.mode(), WpCtrlMode::MissionComplete);
    }

    #[test]
    fn test_empty_mission_completes_on_first_pose() {
        let mut ctrl = wp_ctrl(&[], false);

        let (output, report) = ctrl.proc(&pose_tm(0.0, 0.0)).unwrap();
        assert!(output.is_none());
        assert!(report.mission_complete);

        // Later poses must not restart the mission
        let (output, report) = ctrl.proc(&pose_tm(1.0, 1.0)).unwrap();
        assert!(output.is_none());
        assert!(report.mission_complete);
    }

    #[test]
    fn test_pose_updates_belief_without_retriggering_advance() {
        let mut ctrl = wp_ctrl(&[[0.0, 0.5], [0.5, 0.0]], false);

        ctrl.proc(&pose_tm(0.0, 0.0)).unwrap();
        let setpoint = ctrl.setpoint().unwrap();

        // A pose update away from arrival leaves the setpoint untouched
        ctrl.proc(&pose_tm(0.01, 0.1)).unwrap();
        let new_setpoint = ctrl.setpoint().unwrap();
        assert_eq!(setpoint.position_m, new_setpoint.position_m);
        assert_eq!(ctrl.current_pose().unwrap().position_m[1], 0.1);
    }
}
