//! # Pose Client
//!
//! The pose client subscribes to the pose telemetry published by the agent.
//! Messages are drained without blocking at the start of every control cycle,
//! keeping all controller processing on the main thread.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    eqpt::agent::PoseTm,
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Pose telemetry client
pub struct PoseClient {
    socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PoseClientError {
    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not subscribe to the pose feed: {0}")]
    SubscribeError(zmq::Error),

    #[error("The client is not connected to the agent")]
    NotConnected,

    #[error("Could not recieve a message from the agent: {0}")]
    RecvError(zmq::Error),

    #[error("The agent sent a message which was not valid UTF-8")]
    NonUtf8Message,

    #[error("Could not parse the recieved pose: {0}")]
    PoseParseError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PoseClient {
    /// Create a new instance of the pose client.
    ///
    /// This function will not block until the agent connects.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, PoseClientError> {
        // Create the socket options
        let socket_options = SocketOptions {
            block_on_first_connect: false,
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
            zmq::SUB,
            socket_options,
            &params.pose_tm_endpoint,
        )
        .map_err(PoseClientError::SocketError)?;

        // Subscribe to everything published on the pose endpoint
        socket
            .set_subscribe(b"")
            .map_err(PoseClientError::SubscribeError)?;

        // Create self
        Ok(Self { socket })
    }

    /// Check if the client is connected to the agent
    pub fn is_connected(&self) -> bool {
        self.socket.connected()
    }

    /// Recieve a single pose message from the agent.
    ///
    /// The protocol here is to call `recv_pose` in a loop until `Ok(None)` is
    /// returned, indicating that there are no more pending poses right now.
    /// The last pose drained is the freshest belief available this cycle.
    pub fn recv_pose(&self) -> Result<Option<PoseTm>, PoseClientError> {
        // Check the agent is connected
        if !self.socket.connected() {
            return Err(PoseClientError::NotConnected);
        }

        // Attempt to read a string from the socket
        let pose_str = match self.socket.recv_string(0) {
            // Valid message
            Ok(Ok(s)) => s,
            // Non UTF-8 message
            Ok(Err(_)) => return Err(PoseClientError::NonUtf8Message),
            // No message in timeout
            Err(zmq::Error::EAGAIN) => return Ok(None),
            // Recieve error
            Err(e) => return Err(PoseClientError::RecvError(e)),
        };

        // Parse the pose
        PoseTm::from_json(&pose_str)
            .map(Some)
            .map_err(PoseClientError::PoseParseError)
    }
}
