use scenesync_serde::SerdeErr;
use thiserror::Error;

use crate::{codec::scene_category::SceneCategory, scene::error::PackageError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A record's declared size or discriminant is inconsistent with the buffer
    #[error("Malformed {category} buffer at record {record}: {source}")]
    MalformedBuffer {
        category: SceneCategory,
        record: usize,
        source: SerdeErr,
    },

    /// A package could not be encoded because its arrays disagree
    #[error("Cannot encode {category} record {record}: {source}")]
    InvalidPackage {
        category: SceneCategory,
        record: usize,
        source: PackageError,
    },
}

impl CodecError {
    pub fn category(&self) -> SceneCategory {
        match self {
            CodecError::MalformedBuffer { category, .. } => *category,
            CodecError::InvalidPackage { category, .. } => *category,
        }
    }
}
