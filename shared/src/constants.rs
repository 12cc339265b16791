use std::time::Duration;

/// Port on which clients receive relayed live updates
pub const DEFAULT_SUBSCRIBE_PORT: u16 = 5556;
/// Port to which clients publish their live updates
pub const DEFAULT_PUBLISH_PORT: u16 = 5557;
/// Port of the scene transfer request/reply bus
pub const DEFAULT_SCENE_PORT: u16 = 5565;

/// Fixed width of a node name on the wire
pub const NODE_NAME_LENGTH: usize = 64;
/// Bone capacity of a skinned mesh node
pub const MAX_SKIN_BONES: usize = 99;
/// Bone count carried by a BONEANIM frame from legacy peers.
/// Only a compatibility default; frames of any bone count decode.
pub const LEGACY_BONE_COUNT: usize = 25;

/// Live updates held for the main thread before the oldest is discarded
pub const INBOUND_QUEUE_CAPACITY: usize = 64;
/// Silence on the update bus after which the link is reported as possibly stale
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);
