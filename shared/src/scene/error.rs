use thiserror::Error;

use crate::types::ObjectId;

/// A resource package breaks one of its structural invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageError {
    #[error("Mesh has {vertices} vertices but {normals} normals")]
    NormalCountMismatch { vertices: usize, normals: usize },

    #[error("Mesh has {weights} bone weight sets but {indices} bone index sets")]
    BoneDataMismatch { weights: usize, indices: usize },

    #[error("Skeleton rest pose arrays ({positions} positions, {rotations} rotations, {scales} scales) do not match {bones} skeleton bones")]
    RestPoseMismatch {
        bones: usize,
        positions: usize,
        rotations: usize,
        scales: usize,
    },
}

/// The flattened node list does not describe a well-formed tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneTreeError {
    #[error("Node {object_id} declares {child_count} children, which is negative")]
    NegativeChildCount { object_id: ObjectId, child_count: i32 },

    #[error("Node {object_id} declares {declared} children but only {available} nodes follow")]
    MissingChildren {
        object_id: ObjectId,
        declared: i32,
        available: usize,
    },

    #[error("Scene holds {count} nodes, more than an object ID can address")]
    TooManyNodes { count: usize },
}
