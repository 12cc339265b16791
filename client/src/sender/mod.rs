pub mod binary_sender;
pub mod publisher;
pub mod sender_registry;
pub mod text_sender;

pub use inner::ObjectSender;

mod inner {
    use scenesync_shared::{Connector, Endpoint, ObjectId, ParameterValue, SceneData, SenderId};

    use crate::error::SenderError;

    /// Publishes local edits onto one downstream bus, in that bus's encoding
    pub trait ObjectSender: Send {
        /// Name used in logs and errors
        fn name(&self) -> &str;
        /// Sets the endpoint the publisher connects to on `start`
        fn set_target(&mut self, endpoint: Endpoint);
        fn target(&self) -> Option<&Endpoint>;
        /// Connects and spawns the publisher thread
        fn start(&mut self, connector: &dyn Connector) -> Result<(), SenderError>;
        fn is_running(&self) -> bool;
        /// Encodes one edit and queues it for the publisher thread.
        /// Returns `Ok(false)` when this bus has no encoding for the parameter.
        fn send_object(
            &mut self,
            local_id: SenderId,
            scene: &SceneData,
            object_id: ObjectId,
            value: &ParameterValue,
        ) -> Result<bool, SenderError>;
        /// Stops the publisher thread once queued frames are written
        fn finish(&mut self);
    }
}
