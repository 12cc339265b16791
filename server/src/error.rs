use thiserror::Error;

use scenesync_shared::{CacheError, CodecError, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncServerError {
    #[error("Failed to bind {address}: {reason}")]
    Bind { address: String, reason: String },

    #[error("Failed to spawn {name} thread: {reason}")]
    Spawn { name: String, reason: String },

    #[error("Scene could not be encoded: {0}")]
    Codec(#[from] CodecError),

    #[error("Scene cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
