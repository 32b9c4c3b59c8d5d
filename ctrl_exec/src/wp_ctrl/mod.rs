//! # Waypoint control module
//!
//! Waypoint control drives the agent through the mission's sequence of
//! relative waypoints. Each waypoint is an offset which, applied to the
//! current anchor pose, gives the setpoint the agent is driven toward.
//!
//! The module reacts to two inputs: pose telemetry from the agent, which
//! updates the controller's belief of where the agent is (and, on the first
//! reception, establishes the first setpoint), and the cyclic tick, which
//! compares belief against setpoint and emits a velocity command.
//!
//! The control law is bang-bang: each axis is commanded at a fixed magnitude
//! towards the setpoint while its error exceeds the position tolerance, and
//! at zero otherwise. Arrival on both axes advances the mission to the next
//! waypoint, and an exhausted mission puts the module in a terminal
//! mission-complete mode which emits no further commands.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod mission;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use mission::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Magnitude of a bang-bang axis demand.
///
/// Units: meters/second
pub const AXIS_SPEED_MS: f64 = 1.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during WpCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum WpCtrlError {
    /// The module is in follow mode but has no pose, which can only happen if
    /// the mode was forced externally.
    #[error("In follow mode but no pose has been received")]
    NoPose,

    /// The module is in follow mode but has no setpoint, which can only
    /// happen if the mode was forced externally.
    #[error("In follow mode but no setpoint has been established")]
    NoSetpoint,
}
