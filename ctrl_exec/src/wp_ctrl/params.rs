//! Waypoint control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for waypoint control
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Params {
    /// The tolerance on each position axis within which the agent is
    /// considered to have arrived at the setpoint.
    ///
    /// Units: meters
    pub position_tol_m: f64,

    /// If true the mission ends after the first waypoint is reached,
    /// discarding any remaining waypoints. If false the full queue is
    /// driven.
    pub single_shot: bool,

    /// The mission's waypoint offsets, in visit order. Each offset is
    /// relative to the previous setpoint (or to the agent's pose at mission
    /// start for the first waypoint), not an absolute coordinate.
    ///
    /// Units: meters
    pub mission_offsets_m: Vec<[f64; 2]>,
}
