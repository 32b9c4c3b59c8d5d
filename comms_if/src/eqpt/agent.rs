//! # Agent Equipment Messages
//!
//! Messages exchanged with the driven agent: the pose telemetry it publishes
//! and the velocity commands it accepts. Both are JSON strings on the wire.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Pose telemetry published by the agent whenever its position changes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct PoseTm {
    /// Position along the world frame X axis.
    ///
    /// Units: meters
    pub x_m: f64,

    /// Position along the world frame Y axis.
    ///
    /// Units: meters
    pub y_m: f64,

    /// Heading (angle to the world frame +ve X axis).
    ///
    /// Units: radians
    pub heading_rad: f64,
}

/// Velocity demand sent to the agent.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct VelCmd {
    /// Linear velocity demand along the world frame X axis.
    ///
    /// Units: meters/second
    pub lin_x_ms: f64,

    /// Linear velocity demand along the world frame Y axis.
    ///
    /// Units: meters/second
    pub lin_y_ms: f64,

    /// Angular velocity demand about the vertical axis. Carried for
    /// completeness of the wire format, always zero in this system.
    ///
    /// Units: radians/second
    pub ang_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PoseTm {
    /// Parse a pose telemetry message from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize this message to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl VelCmd {
    /// Parse a velocity command from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize this command to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The all-zero command, sent on arrival at a setpoint and while the system
/// is in safe mode.
impl Default for VelCmd {
    fn default() -> Self {
        Self {
            lin_x_ms: 0.0,
            lin_y_ms: 0.0,
            ang_rads: 0.0,
        }
    }
}
