//! # TM Server

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

use comms_if::{
    eqpt::agent::VelCmd,
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

use crate::data_store::DataStore;
use crate::loc::Pose;
use crate::wp_ctrl;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Telemetry server
pub struct TmServer {
    socket: MonitoredSocket,
}

/// Telemetry packet that is output by the server.
#[derive(Debug, Serialize)]
pub struct TmPacket {
    pub elapsed_s: f64,

    pub safe: bool,

    pub safe_cause: String,

    pub wp_ctrl_mode: String,

    pub current_pose: Option<Pose>,

    pub setpoint: Option<Pose>,

    pub vel_cmd: Option<VelCmd>,

    pub wp_ctrl_status_rpt: wp_ctrl::StatusReport,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TmServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send telemetry: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the telemetry: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TmServer {
    /// Create a new instance of the TM Server.
    ///
    /// This function will not block until a subscriber connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, TmServerError> {
        // Create the socket options
        let socket_options = SocketOptions {
            block_on_first_connect: false,
            bind: true,
            connect_timeout: 1000,
            heartbeat_ivl: 500,
            heartbeat_ttl: 1000,
            heartbeat_timeout: 1000,
            linger: 1,
            recv_timeout: 10,
            send_timeout: 10,
            ..Default::default()
        };

        // Connect the socket
        let socket = MonitoredSocket::new(
            ctx,
            zmq::PUB,
            socket_options,
            &params.ctrl_tm_endpoint,
        )
        .map_err(TmServerError::SocketError)?;

        // Create self
        Ok(Self { socket })
    }

    pub fn send(&mut self, ds: &DataStore) -> Result<(), TmServerError> {
        // Build packet
        let packet = TmPacket::from_datastore(ds);

        // Serialize packet
        let packet_string =
            serde_json::to_string(&packet).map_err(TmServerError::SerializationError)?;

        // Send the packet
        self.socket
            .send(&packet_string, 0)
            .map_err(TmServerError::SendError)
    }
}

impl TmPacket {
    pub fn from_datastore(ds: &DataStore) -> Self {
        Self {
            elapsed_s: ds.elapsed_s,
            safe: ds.safe,
            safe_cause: format!("{:?}", ds.safe_cause),
            wp_ctrl_mode: format!("{:?}", ds.wp_ctrl.mode()),
            current_pose: ds.wp_ctrl.current_pose(),
            setpoint: ds.wp_ctrl.setpoint(),
            vel_cmd: ds.wp_ctrl_output,
            wp_ctrl_status_rpt: ds.wp_ctrl_status_rpt,
        }
    }
}
