use thiserror::Error;

use scenesync_shared::{
    CacheError, CodecError, ObjectId, SceneCategory, TransportError, UpdateError,
};

/// A scene transfer attempt that ended without a scene.
/// The previous snapshot is left untouched and a fresh transfer may be retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Scene transfer from {endpoint} timed out waiting for {category}")]
    Timeout {
        endpoint: String,
        category: SceneCategory,
    },

    #[error("Scene transfer from {endpoint} failed: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    #[error("Received scene could not be decoded: {0}")]
    Decode(#[from] CodecError),

    #[error("Scene transfer thread stopped unexpectedly")]
    ThreadPanicked,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SenderError {
    #[error("Sender {name} has no target endpoint")]
    NoTarget { name: String },

    #[error("Sender {name} is not running")]
    NotRunning { name: String },

    #[error("Sender {name} is already running")]
    AlreadyRunning { name: String },

    #[error("Outbound queue of sender {name} is full, frame dropped")]
    QueueFull { name: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Update error: {0}")]
    Update(#[from] UpdateError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncClientError {
    #[error("No scene has been received yet")]
    NoScene,

    #[error("Live sync is already running")]
    AlreadySyncing,

    #[error("Object {object_id} is not locked by this client")]
    NotLockHolder { object_id: ObjectId },

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Update error: {0}")]
    Update(#[from] UpdateError),

    #[error("Sender error: {0}")]
    Sender(#[from] SenderError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}
