//! # Command Server
//!
//! The command server publishes velocity commands to the agent.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    eqpt::agent::VelCmd,
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Velocity command server
pub struct CmdServer {
    socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CmdServerError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not send the command: {0}")]
    SendError(zmq::Error),

    #[error("Could not serialize the command: {0}")]
    SerializationError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CmdServer {
    /// Create a new instance of the command server.
    ///
    /// This function will not block until a subscriber connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, CmdServerError> {
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
            &params.vel_cmd_endpoint,
        )
        .map_err(CmdServerError::SocketError)?;

        // Create self
        Ok(Self { socket })
    }

    /// Publish the given velocity command to the agent.
    pub fn send(&mut self, cmd: &VelCmd) -> Result<(), CmdServerError> {
        // Serialize the command
        let cmd_str = cmd.to_json().map_err(CmdServerError::SerializationError)?;

        // Send the command
        self.socket
            .send(&cmd_str, 0)
            .map_err(CmdServerError::SendError)
    }
}
