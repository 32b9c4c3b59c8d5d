//! # Controller library.
//!
//! This library allows other crates in the workspace to access items defined
//! inside the controller crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Command server - publishes velocity commands to the agent
pub mod cmd_server;

/// Data store - global state of the executable
pub mod data_store;

/// Localisation module - the pose type and its composition rules
pub mod loc;

/// Executable parameters
pub mod params;

/// Pose client - recieves pose telemetry from the agent
pub mod pose_client;

/// Telemetry server - publishes the executable's own telemetry
pub mod tm_server;

/// Waypoint control module - drives the agent through the mission waypoints
pub mod wp_ctrl;
