use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, PoisonError, RwLock,
    },
    time::Duration,
};

use log::{debug, info, warn};

use scenesync_shared::{
    encode, FrameReceiver, FrameSender, SceneBuffers, SceneCache, SceneCategory, SceneData,
};

use crate::error::SyncServerError;

/// Answers scene transfer requests from the encoded buffers of one scene
#[derive(Clone, Default)]
pub struct SceneServer {
    buffers: Arc<RwLock<SceneBuffers>>,
}

impl SceneServer {
    pub fn new(buffers: SceneBuffers) -> Self {
        Self {
            buffers: Arc::new(RwLock::new(buffers)),
        }
    }

    pub fn from_scene(scene: &SceneData) -> Result<Self, SyncServerError> {
        Ok(Self::new(encode(scene)?))
    }

    /// Serves a scene previously written to the on-disk cache
    pub fn from_cache(cache: &SceneCache, scene_name: &str) -> Result<Self, SyncServerError> {
        let buffers = cache.read(scene_name)?;
        info!(
            "Serving cached scene '{}' ({} bytes)",
            scene_name,
            buffers.total_len()
        );
        Ok(Self::new(buffers))
    }

    /// Swaps the served scene; transfers already underway may mix both
    pub fn set_buffers(&self, buffers: SceneBuffers) {
        *self.buffers.write().unwrap_or_else(PoisonError::into_inner) = buffers;
    }

    pub fn set_scene(&self, scene: &SceneData) -> Result<(), SyncServerError> {
        self.set_buffers(encode(scene)?);
        Ok(())
    }

    pub fn buffers(&self) -> SceneBuffers {
        self.buffers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reply to one transfer command. Unknown commands get an empty reply.
    pub fn respond(&self, command: &[u8]) -> Vec<u8> {
        match SceneCategory::from_command(command) {
            Some(category) => self
                .buffers
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(category)
                .to_vec(),
            None => {
                warn!(
                    "Unknown scene command '{}'",
                    String::from_utf8_lossy(command)
                );
                Vec::new()
            }
        }
    }

    /// Answers requests on one connection until it closes or `running` drops
    pub fn serve(
        &self,
        mut receiver: Box<dyn FrameReceiver>,
        mut sender: Box<dyn FrameSender>,
        running: &AtomicBool,
        poll_interval: Duration,
    ) {
        while running.load(Ordering::Relaxed) {
            match receiver.receive(poll_interval) {
                Ok(Some(command)) => {
                    let reply = self.respond(&command);
                    debug!(
                        "Scene request '{}' answered with {} bytes",
                        String::from_utf8_lossy(&command),
                        reply.len()
                    );
                    if let Err(error) = sender.send(&reply) {
                        debug!("Scene client went away mid-reply: {}", error);
                        return;
                    }
                }
                Ok(None) => {}
                Err(error) if error.is_closed() => {
                    debug!("Scene client disconnected");
                    return;
                }
                Err(error) => {
                    warn!("Scene connection failed: {}", error);
                    return;
                }
            }
        }
    }
}
