use thiserror::Error;

use crate::{
    lock::error::LockError,
    scene::node::NodeType,
    types::{ObjectId, SenderId},
    update::param_type::ParamType,
};

/// Why a single live update was not applied.
/// These are always recovered locally: the update is dropped and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("Update frame of {length} bytes is shorter than its 6 byte header")]
    FrameTooShort { length: usize },

    #[error("Unknown parameter type {value}")]
    UnknownParamType { value: u8 },

    #[error("Parameter type {param_type:?} is not supported")]
    UnsupportedParamType { param_type: ParamType },

    #[error("{param_type:?} payload of {actual} bytes does not match the expected size")]
    PayloadSize { param_type: ParamType, actual: usize },

    #[error("Object {object_id} is outside the scene's {node_count} nodes")]
    UnknownObjectId { object_id: ObjectId, node_count: usize },

    #[error("{param_type:?} does not apply to object {object_id}, a {node_type:?} node")]
    NotApplicable {
        param_type: ParamType,
        object_id: ObjectId,
        node_type: NodeType,
    },

    #[error("Object {object_id} is locked by sender {owner}, edit from sender {editor} refused")]
    LockRejected {
        object_id: ObjectId,
        owner: SenderId,
        editor: SenderId,
    },

    #[error("Lock error: {0}")]
    Lock(#[from] LockError),
}
