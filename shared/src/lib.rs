//! # Scenesync Shared
//! Scene codec, live update protocol, lock coordination and transport traits
//! shared between scenesync-server & scenesync-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use scenesync_serde::{
    ByteReader, ByteWrite, ByteWriter, ConstByteLength, Serde, SerdeErr,
};

mod codec;
mod constants;
mod lock;
mod scene;
mod scene_cache;
mod threads;
mod transport;
mod types;
mod update;

pub use codec::{
    error::CodecError,
    scene_buffers::SceneBuffers,
    scene_category::SceneCategory,
    scene_codec::{decode, decode_header, decode_nodes, encode, encode_category},
};
pub use constants::{
    DEFAULT_PUBLISH_PORT, DEFAULT_RECEIVE_TIMEOUT, DEFAULT_SCENE_PORT, DEFAULT_SUBSCRIBE_PORT,
    INBOUND_QUEUE_CAPACITY, LEGACY_BONE_COUNT, MAX_SKIN_BONES, NODE_NAME_LENGTH,
};
pub use lock::{
    error::LockError,
    lock_coordinator::{EditPermission, LockCoordinator, LockTransition},
    lock_mode::LockMode,
};
pub use scene::{
    error::{PackageError, SceneTreeError},
    node::{
        CameraNode, GeoNode, LightNode, LightType, NodeCommon, NodeType, SceneNode, SkinData,
        SkinnedGeoNode,
    },
    node_name::NodeName,
    packages::{CharacterPackage, MaterialPackage, ObjectPackage, SceneHeader, TexturePackage},
    scene_data::{LiveState, SceneData},
    scene_tree::SceneTree,
};
pub use scene_cache::{CacheError, SceneCache};
pub use threads::join_with_grace;
pub use transport::{
    endpoint::Endpoint,
    error::TransportError,
    frame::{write_frame, FrameDecoder, MAX_FRAME_LENGTH},
    Connector, FrameReceiver, FrameSender, Requester,
};
pub use types::{ObjectId, SenderId};
pub use update::{
    error::UpdateError,
    param_type::{ParamType, PayloadSize},
    parameter_update::{FrameHeader, ParameterUpdate, FRAME_HEADER_SIZE},
    parameter_value::ParameterValue,
    update_applier::{ApplyOutcome, UpdateApplier},
};

cfg_if! {
    if #[cfg(feature = "transport_tcp")] {
        pub use transport::tcp::{TcpConnector, TcpFrameReceiver, TcpFrameSender, TcpRequester};
    }
}
