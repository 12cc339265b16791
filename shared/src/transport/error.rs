use thiserror::Error;

/// Errors raised by scene transfer and update bus sockets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The peer could not be reached
    #[error("Failed to connect to {endpoint}: {reason}")]
    ConnectFailed { endpoint: String, reason: String },

    /// No reply arrived within the request timeout
    #[error("Timed out after {timeout_ms} ms waiting for a reply")]
    Timeout { timeout_ms: u64 },

    /// The peer or the local side closed the socket
    #[error("Socket closed")]
    SocketClosed,

    /// A length prefix announced a frame larger than the receiver accepts
    #[error("Frame of {length} bytes exceeds the {max} byte limit")]
    FrameTooLarge { length: usize, max: usize },

    /// Any other socket failure
    #[error("Socket I/O error: {0}")]
    Io(String),
}

impl TransportError {
    /// Errors expected while a deliberate shutdown is in progress
    pub fn is_closed(&self) -> bool {
        matches!(self, TransportError::SocketClosed)
    }
}
