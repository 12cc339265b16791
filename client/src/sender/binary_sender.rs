use log::debug;

use scenesync_shared::{
    Connector, Endpoint, ObjectId, ParameterUpdate, ParameterValue, SceneData, SenderId,
    UpdateError,
};

use crate::{
    error::SenderError,
    sender::{
        publisher::{Publisher, PublisherSettings},
        ObjectSender,
    },
};

/// Publishes binary `ParameterUpdate` frames onto the sync bus
pub struct BinarySender {
    target: Option<Endpoint>,
    settings: PublisherSettings,
    publisher: Option<Publisher>,
}

impl BinarySender {
    pub const NAME: &'static str = "binary";

    pub fn new(settings: PublisherSettings) -> Self {
        Self {
            target: None,
            settings,
            publisher: None,
        }
    }

    /// Encodes one edit as a wire frame
    pub fn encode(
        local_id: SenderId,
        scene: &SceneData,
        object_id: ObjectId,
        value: &ParameterValue,
    ) -> Result<Vec<u8>, UpdateError> {
        if !value.param_type().is_control() && !scene.contains(object_id) {
            return Err(UpdateError::UnknownObjectId {
                object_id,
                node_count: scene.node_count(),
            });
        }
        Ok(ParameterUpdate::new(local_id, object_id, value.clone()).encode())
    }
}

impl Default for BinarySender {
    fn default() -> Self {
        Self::new(PublisherSettings::default())
    }
}

impl ObjectSender for BinarySender {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn set_target(&mut self, endpoint: Endpoint) {
        self.target = Some(endpoint);
    }

    fn target(&self) -> Option<&Endpoint> {
        self.target.as_ref()
    }

    fn start(&mut self, connector: &dyn Connector) -> Result<(), SenderError> {
        if self.is_running() {
            return Err(SenderError::AlreadyRunning {
                name: Self::NAME.to_string(),
            });
        }
        let target = self.target.as_ref().ok_or_else(|| SenderError::NoTarget {
            name: Self::NAME.to_string(),
        })?;
        let frame_sender = connector.connect_publisher(target)?;
        debug!("Binary sender publishing to {}", target);
        self.publisher = Some(Publisher::start(Self::NAME, frame_sender, &self.settings)?);
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.publisher.as_ref().is_some_and(Publisher::is_running)
    }

    fn send_object(
        &mut self,
        local_id: SenderId,
        scene: &SceneData,
        object_id: ObjectId,
        value: &ParameterValue,
    ) -> Result<bool, SenderError> {
        let publisher = self.publisher.as_ref().ok_or_else(|| SenderError::NotRunning {
            name: Self::NAME.to_string(),
        })?;
        let frame = Self::encode(local_id, scene, object_id, value)?;
        publisher.enqueue(frame)?;
        Ok(true)
    }

    fn finish(&mut self) {
        if let Some(mut publisher) = self.publisher.take() {
            publisher.stop();
        }
    }
}
