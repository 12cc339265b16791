use log::{info, warn};

use scenesync_shared::{Connector, Endpoint, ObjectId, ParameterValue, SceneData, SenderId};

use crate::{error::SenderError, sender::ObjectSender};

/// The senders every local edit is broadcast to, owned by the client
#[derive(Default)]
pub struct SenderRegistry {
    senders: Vec<Box<dyn ObjectSender>>,
}

impl SenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sender: Box<dyn ObjectSender>) {
        info!("Registered {} sender", sender.name());
        self.senders.push(sender);
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.senders.iter().map(|sender| sender.name()).collect()
    }

    /// Gives every sender without a target the default one
    pub fn default_targets(&mut self, endpoint: &Endpoint) {
        for sender in &mut self.senders {
            if sender.target().is_none() {
                sender.set_target(endpoint.clone());
            }
        }
    }

    /// Starts every sender that is not running yet
    pub fn start_all(&mut self, connector: &dyn Connector) -> Result<(), SenderError> {
        for sender in &mut self.senders {
            if !sender.is_running() {
                sender.start(connector)?;
            }
        }
        Ok(())
    }

    /// Hands one edit to every sender. Each sender is attempted even if an
    /// earlier one fails; the first failure is returned.
    pub fn broadcast(
        &mut self,
        local_id: SenderId,
        scene: &SceneData,
        object_id: ObjectId,
        value: &ParameterValue,
    ) -> Result<usize, SenderError> {
        let mut delivered = 0;
        let mut first_error = None;
        for sender in &mut self.senders {
            match sender.send_object(local_id, scene, object_id, value) {
                Ok(true) => delivered += 1,
                Ok(false) => {}
                Err(error) => {
                    warn!("Sender {} dropped {:?}: {}", sender.name(), value.param_type(), error);
                    first_error.get_or_insert(error);
                }
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(delivered),
        }
    }

    pub fn finish_all(&mut self) {
        for sender in &mut self.senders {
            sender.finish();
        }
    }
}
