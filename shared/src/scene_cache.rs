use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, info};
use thiserror::Error;

use crate::codec::{scene_buffers::SceneBuffers, scene_category::SceneCategory};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("Scene cache I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Scene cache is missing required buffer {path}")]
    MissingBuffer { path: String },
}

/// Stores the six encoded scene buffers as `<scene>_<category>.bytes` files
#[derive(Debug, Clone)]
pub struct SceneCache {
    directory: PathBuf,
}

impl SceneCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, scene_name: &str, category: SceneCategory) -> PathBuf {
        self.directory
            .join(format!("{}_{}.bytes", scene_name, category.command()))
    }

    pub fn write(&self, scene_name: &str, buffers: &SceneBuffers) -> Result<(), CacheError> {
        fs::create_dir_all(&self.directory).map_err(|error| CacheError::Io {
            path: self.directory.display().to_string(),
            reason: error.to_string(),
        })?;
        for category in SceneCategory::TRANSFER_ORDER {
            let path = self.path_for(scene_name, category);
            fs::write(&path, buffers.get(category)).map_err(|error| CacheError::Io {
                path: path.display().to_string(),
                reason: error.to_string(),
            })?;
        }
        info!(
            "Cached scene '{}' ({} bytes) in {}",
            scene_name,
            buffers.total_len(),
            self.directory.display()
        );
        Ok(())
    }

    /// Loads a cached scene; optional categories that were never written read as empty
    pub fn read(&self, scene_name: &str) -> Result<SceneBuffers, CacheError> {
        let mut buffers = SceneBuffers::default();
        for category in SceneCategory::TRANSFER_ORDER {
            let path = self.path_for(scene_name, category);
            match fs::read(&path) {
                Ok(bytes) => buffers.set(category, bytes),
                Err(error) if error.kind() == ErrorKind::NotFound => {
                    if !category.is_optional() {
                        return Err(CacheError::MissingBuffer {
                            path: path.display().to_string(),
                        });
                    }
                    debug!("No cached {} buffer for scene '{}'", category, scene_name);
                }
                Err(error) => {
                    return Err(CacheError::Io {
                        path: path.display().to_string(),
                        reason: error.to_string(),
                    })
                }
            }
        }
        Ok(buffers)
    }

    pub fn contains(&self, scene_name: &str) -> bool {
        SceneCategory::TRANSFER_ORDER
            .into_iter()
            .filter(|category| !category.is_optional())
            .all(|category| self.path_for(scene_name, category).is_file())
    }
}
