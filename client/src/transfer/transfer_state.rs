use std::fmt;

use scenesync_shared::SceneCategory;

/// Where a scene transfer currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferState {
    #[default]
    Idle,
    Connecting,
    /// Waiting for the reply to one category request
    Requesting(SceneCategory),
    Decoding,
    Ready,
    /// The last attempt failed; a new one starts over from `Connecting`
    Failed,
}

impl TransferState {
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            TransferState::Connecting | TransferState::Requesting(_) | TransferState::Decoding
        )
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferState::Idle => f.write_str("idle"),
            TransferState::Connecting => f.write_str("connecting"),
            TransferState::Requesting(category) => write!(f, "requesting {}", category),
            TransferState::Decoding => f.write_str("decoding"),
            TransferState::Ready => f.write_str("ready"),
            TransferState::Failed => f.write_str("failed"),
        }
    }
}
