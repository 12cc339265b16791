use std::time::Duration;

use log::{debug, info, warn};

use scenesync_shared::{
    decode, Connector, Endpoint, SceneBuffers, SceneCategory, SceneData, TransportError,
};

use crate::{client_config::ClientConfig, error::TransferError, transfer::transfer_state::TransferState};

pub const PROGRESS_INIT: f32 = 0.1;
pub const PROGRESS_DONE: f32 = 1.0;

/// Progress reported once the reply for `category` has arrived
pub fn progress_after(category: SceneCategory) -> (f32, &'static str) {
    match category {
        SceneCategory::Header => (0.15, "..Received Header.."),
        SceneCategory::Textures => (0.33, "..Received Textures.."),
        SceneCategory::Objects => (0.80, "..Received Objects.."),
        SceneCategory::Characters => (0.85, "..Received Characters.."),
        SceneCategory::Materials => (0.88, "..Received Materials.."),
        SceneCategory::Nodes => (0.9, "..Received Nodes.."),
    }
}

/// Runs one full scene transfer over a request/reply socket
pub struct SceneReceiver {
    endpoint: Endpoint,
    request_timeout: Duration,
    skip_auxiliary: bool,
    state: TransferState,
}

impl SceneReceiver {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            endpoint: config.scene_endpoint(),
            request_timeout: config.request_timeout,
            skip_auxiliary: config.skip_auxiliary,
            state: TransferState::Idle,
        }
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    /// Categories requested, in transfer order
    pub fn categories(&self) -> Vec<SceneCategory> {
        SceneCategory::TRANSFER_ORDER
            .into_iter()
            .filter(|category| !(self.skip_auxiliary && category.is_optional()))
            .collect()
    }

    /// Requests every category and decodes them into a fresh scene.
    /// `progress` is called with a fraction in `[0, 1]` and a stage label.
    pub fn receive(
        &mut self,
        connector: &dyn Connector,
        progress: &mut dyn FnMut(f32, &str),
    ) -> Result<SceneData, TransferError> {
        let buffers = self.fetch_buffers(connector, progress)?;
        self.build(&buffers, progress)
    }

    /// Decodes fetched buffers, the last step of a transfer
    pub fn build(
        &mut self,
        buffers: &SceneBuffers,
        progress: &mut dyn FnMut(f32, &str),
    ) -> Result<SceneData, TransferError> {
        self.state = TransferState::Decoding;
        let scene = decode(buffers).map_err(|error| {
            self.state = TransferState::Failed;
            warn!("Decoding scene from {} failed: {}", self.endpoint, error);
            TransferError::Decode(error)
        })?;

        self.state = TransferState::Ready;
        progress(PROGRESS_DONE, "..Building Scene..");
        info!(
            "Received scene from {}: {} nodes, {} objects, {} textures",
            self.endpoint,
            scene.node_count(),
            scene.objects.len(),
            scene.textures.len()
        );
        Ok(scene)
    }

    /// Requests every category without decoding. Skipped categories stay empty.
    pub fn fetch_buffers(
        &mut self,
        connector: &dyn Connector,
        progress: &mut dyn FnMut(f32, &str),
    ) -> Result<SceneBuffers, TransferError> {
        self.state = TransferState::Connecting;
        progress(PROGRESS_INIT, "Init Scene Receiver..");

        let mut requester = connector
            .connect_requester(&self.endpoint, self.request_timeout)
            .map_err(|error| self.fail(SceneCategory::Header, error))?;

        let mut buffers = SceneBuffers::default();
        for category in self.categories() {
            self.state = TransferState::Requesting(category);
            let reply = requester
                .request(category.command().as_bytes())
                .map_err(|error| self.fail(category, error))?;
            debug!("Received {} bytes of {}", reply.len(), category);
            buffers.set(category, reply);

            let (fraction, label) = progress_after(category);
            progress(fraction, label);
        }
        Ok(buffers)
    }

    fn fail(&mut self, category: SceneCategory, error: TransportError) -> TransferError {
        self.state = TransferState::Failed;
        warn!(
            "Scene transfer from {} failed at {}: {}",
            self.endpoint, category, error
        );
        match error {
            TransportError::Timeout { .. } => TransferError::Timeout {
                endpoint: self.endpoint.to_string(),
                category,
            },
            other => TransferError::ConnectionFailed {
                endpoint: self.endpoint.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
