use std::{sync::Arc, thread};

use log::{debug, info, warn};

use scenesync_shared::{
    decode, ApplyOutcome, Connector, LockCoordinator, LockTransition, ObjectId, ParamType,
    ParameterUpdate, ParameterValue, SceneCache, SceneData, SenderId, UpdateApplier,
};

use crate::{
    client_config::ClientConfig,
    error::{SyncClientError, TransferError},
    sender::{binary_sender::BinarySender, sender_registry::SenderRegistry, ObjectSender},
    sender_id::resolve_sender_id,
    transfer::{scene_receiver::SceneReceiver, transfer_state::TransferState},
    update::{update_events::UpdateEvents, update_subscriber::UpdateSubscriber},
};

/// Name the last received scene is cached under
pub const LAST_SCENE_NAME: &str = "last";

// transform parameters republished for a held object when a resend is requested
const RESEND_PARAMETERS: [ParamType; 3] = [ParamType::Pos, ParamType::Rot, ParamType::Scale];

/// A participant in a synced scene: receives the snapshot, applies other
/// participants' updates each `tick` and publishes local edits to every
/// registered sender
pub struct SyncClient {
    config: ClientConfig,
    connector: Arc<dyn Connector>,
    sender_id: SenderId,
    applier: UpdateApplier,
    senders: SenderRegistry,
    scene: Option<SceneData>,
    transfer_state: TransferState,
    subscriber: Option<UpdateSubscriber>,
    locked_object: Option<ObjectId>,
}

impl SyncClient {
    /// Create a new Client publishing local edits on the binary sync bus
    pub fn new(config: ClientConfig, connector: Arc<dyn Connector>) -> Self {
        let mut senders = SenderRegistry::new();
        senders.register(Box::new(BinarySender::new(config.publisher_settings())));
        Self::with_senders(config, connector, senders)
    }

    /// Create a new Client with an explicit set of senders, possibly none
    pub fn with_senders(
        config: ClientConfig,
        connector: Arc<dyn Connector>,
        senders: SenderRegistry,
    ) -> Self {
        let local_ip = if config.sender_id.is_none() {
            connector.local_ip(&config.scene_endpoint())
        } else {
            None
        };
        let sender_id = resolve_sender_id(config.sender_id, local_ip);
        let applier = UpdateApplier::new(sender_id, LockCoordinator::new(config.lock_mode));
        info!("Sync client {} for {}", sender_id, config.server_host);

        Self {
            config,
            connector,
            sender_id,
            applier,
            senders,
            scene: None,
            transfer_state: TransferState::Idle,
            subscriber: None,
            locked_object: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn sender_id(&self) -> SenderId {
        self.sender_id
    }

    pub fn scene(&self) -> Option<&SceneData> {
        self.scene.as_ref()
    }

    pub fn transfer_state(&self) -> TransferState {
        self.transfer_state
    }

    pub fn locks(&self) -> &LockCoordinator {
        self.applier.locks()
    }

    /// The object this client currently holds the lock on
    pub fn locked_object(&self) -> Option<ObjectId> {
        self.locked_object
    }

    pub fn register_sender(&mut self, sender: Box<dyn ObjectSender>) {
        self.senders.register(sender);
    }

    pub fn senders(&self) -> &SenderRegistry {
        &self.senders
    }

    pub fn is_syncing(&self) -> bool {
        self.subscriber.as_ref().is_some_and(UpdateSubscriber::is_running)
    }

    // Scene transfer

    /// Runs a full scene transfer on a transient thread, reporting progress
    /// on the calling thread. On failure the previous scene is kept.
    pub fn receive_scene(
        &mut self,
        mut progress: impl FnMut(f32, &str),
    ) -> Result<&SceneData, SyncClientError> {
        let mut receiver = SceneReceiver::new(&self.config);
        let connector = self.connector.clone();
        let (progress_sender, progress_receiver) = crossbeam_channel::unbounded::<(f32, String)>();
        self.transfer_state = TransferState::Connecting;

        let spawned = thread::Builder::new()
            .name("scenesync-transfer".to_string())
            .spawn(move || {
                let mut report = |fraction: f32, label: &str| {
                    let _ = progress_sender.send((fraction, label.to_string()));
                };
                let fetched = receiver.fetch_buffers(connector.as_ref(), &mut report);
                (receiver, fetched)
            });
        let handle = match spawned {
            Ok(handle) => handle,
            Err(error) => {
                self.transfer_state = TransferState::Failed;
                return Err(TransferError::ConnectionFailed {
                    endpoint: self.config.scene_endpoint().to_string(),
                    reason: error.to_string(),
                }
                .into());
            }
        };

        // ends once the transfer thread drops its sender
        for (fraction, label) in progress_receiver.iter() {
            progress(fraction, &label);
        }
        let Ok((mut receiver, fetched)) = handle.join() else {
            self.transfer_state = TransferState::Failed;
            return Err(TransferError::ThreadPanicked.into());
        };

        let built = fetched.and_then(|buffers| {
            let scene = receiver.build(&buffers, &mut progress)?;
            Ok((buffers, scene))
        });
        let (buffers, scene) = match built {
            Ok(built) => built,
            Err(error) => {
                self.transfer_state = TransferState::Failed;
                return Err(error.into());
            }
        };

        if let Some(directory) = &self.config.cache_directory {
            if let Err(error) = SceneCache::new(directory).write(LAST_SCENE_NAME, &buffers) {
                warn!("Could not cache received scene: {}", error);
            }
        }
        Ok(self.install_scene(scene))
    }

    /// Loads a scene from the on-disk cache instead of the network
    pub fn load_cached_scene(
        &mut self,
        cache: &SceneCache,
        scene_name: &str,
    ) -> Result<&SceneData, SyncClientError> {
        let buffers = cache.read(scene_name)?;
        let scene = decode(&buffers).map_err(TransferError::Decode)?;
        info!("Loaded scene '{}' from {}", scene_name, cache.directory().display());
        Ok(self.install_scene(scene))
    }

    /// Replaces the current scene, forgetting every lock
    pub fn install_scene(&mut self, scene: SceneData) -> &SceneData {
        self.clear_locks();
        self.transfer_state = TransferState::Ready;
        self.scene.insert(scene)
    }

    /// Drops the scene and every lock; a new transfer starts from `Idle`
    pub fn reset_scene(&mut self) {
        if let Err(error) = self.unlock() {
            debug!("Releasing lock on reset failed: {}", error);
        }
        self.scene = None;
        self.clear_locks();
        self.transfer_state = TransferState::Idle;
        info!("Scene reset");
    }

    fn clear_locks(&mut self) {
        self.locked_object = None;
        if let Err(error) = self.applier.locks().try_clear() {
            warn!("Clearing lock table failed: {}", error);
        }
    }

    // Live sync

    /// Subscribes to the update bus and starts every sender
    pub fn start_sync(&mut self) -> Result<(), SyncClientError> {
        if self.is_syncing() {
            return Err(SyncClientError::AlreadySyncing);
        }
        self.subscriber = Some(UpdateSubscriber::start(self.connector.as_ref(), &self.config)?);
        self.senders.default_targets(&self.config.publish_endpoint());
        self.senders.start_all(self.connector.as_ref())?;
        info!(
            "Syncing with {} as sender {} ({} senders)",
            self.config.server_host,
            self.sender_id,
            self.senders.len()
        );
        Ok(())
    }

    /// Applies every update received since the last call. Never blocks on
    /// the network; updates that cannot be applied are logged and skipped.
    pub fn tick(&mut self) -> UpdateEvents {
        let mut events = UpdateEvents::new();
        let Some(subscriber) = &self.subscriber else {
            return events;
        };
        let frames = subscriber.drain();
        let Some(scene) = self.scene.as_mut() else {
            if !frames.is_empty() {
                debug!("Dropped {} updates received before any scene", frames.len());
            }
            return events;
        };

        for frame in frames {
            let update = match ParameterUpdate::decode(&frame) {
                Ok(update) => update,
                Err(error) => {
                    warn!("Dropped update frame: {}", error);
                    events.push_dropped(error);
                    continue;
                }
            };
            let (object_id, param_type) = (update.object_id, update.param_type());

            match self.applier.apply(scene, &update) {
                Ok(ApplyOutcome::Applied) => events.push_applied(object_id, param_type),
                Ok(ApplyOutcome::AppliedDespiteLock { owner }) => {
                    events.push_applied(object_id, param_type);
                    events.push_advisory_violation(object_id, owner);
                }
                Ok(ApplyOutcome::EchoSuppressed) => events.push_echo(),
                Ok(ApplyOutcome::LockChanged(transition)) => {
                    if let LockTransition::TakenOver { previous } = transition {
                        if previous == self.sender_id && self.locked_object == Some(object_id) {
                            warn!("Sender {} took over our lock on object {}", update.sender_id, object_id);
                            self.locked_object = None;
                        }
                    }
                    events.push_lock_change(object_id, update.sender_id, transition);
                }
                Ok(ApplyOutcome::Control(ParamType::Ping)) => events.push_ping(),
                Ok(ApplyOutcome::Control(_)) => events.push_resend_request(),
                Err(error) => {
                    warn!("Dropped update from sender {}: {}", update.sender_id, error);
                    events.push_dropped(error);
                }
            }
        }

        if events.resend_requested() {
            self.republish_locked();
        }
        events
    }

    /// Applies a local edit and hands it to every sender. The edit stays
    /// applied locally even if publishing fails.
    pub fn edit(
        &mut self,
        object_id: ObjectId,
        value: ParameterValue,
    ) -> Result<ApplyOutcome, SyncClientError> {
        let outcome = self.apply_local(object_id, &value)?;
        self.publish(object_id, &value)?;
        Ok(outcome)
    }

    /// Takes the lock on an object, releasing the one held before.
    /// The lock is held locally once this returns, even when publishing
    /// the lock or the release fails.
    pub fn lock(&mut self, object_id: ObjectId) -> Result<(), SyncClientError> {
        if self.locked_object == Some(object_id) {
            return Ok(());
        }
        let released = self.unlock();
        if self.locked_object.is_some() {
            return released;
        }

        let value = ParameterValue::Lock(true);
        self.apply_local(object_id, &value)?;
        self.locked_object = Some(object_id);
        let published = self.publish(object_id, &value);
        released.and(published)
    }

    /// Releases the held lock, if any. The lock is released locally even
    /// when publishing the release fails.
    pub fn unlock(&mut self) -> Result<(), SyncClientError> {
        let Some(object_id) = self.locked_object else {
            return Ok(());
        };
        let value = ParameterValue::Lock(false);
        self.apply_local(object_id, &value)?;
        self.locked_object = None;
        self.publish(object_id, &value)
    }

    fn apply_local(
        &mut self,
        object_id: ObjectId,
        value: &ParameterValue,
    ) -> Result<ApplyOutcome, SyncClientError> {
        let scene = self.scene.as_mut().ok_or(SyncClientError::NoScene)?;
        Ok(self.applier.apply_local(scene, object_id, value)?)
    }

    fn publish(&mut self, object_id: ObjectId, value: &ParameterValue) -> Result<(), SyncClientError> {
        let scene = self.scene.as_ref().ok_or(SyncClientError::NoScene)?;
        self.senders.broadcast(self.sender_id, scene, object_id, value)?;
        Ok(())
    }

    /// Asks every participant to publish its current state again
    pub fn request_resend(&mut self) -> Result<(), SyncClientError> {
        self.broadcast_control(ParameterValue::ResendUpdate)
    }

    pub fn ping(&mut self) -> Result<(), SyncClientError> {
        self.broadcast_control(ParameterValue::Ping)
    }

    fn broadcast_control(&mut self, value: ParameterValue) -> Result<(), SyncClientError> {
        let empty;
        let scene = match &self.scene {
            Some(scene) => scene,
            None => {
                empty = SceneData::default();
                &empty
            }
        };
        self.senders.broadcast(self.sender_id, scene, 0, &value)?;
        Ok(())
    }

    fn republish_locked(&mut self) {
        let (Some(object_id), Some(scene)) = (self.locked_object, self.scene.as_ref()) else {
            return;
        };
        for param_type in RESEND_PARAMETERS {
            let published = ParameterValue::read_from(scene, object_id, param_type)
                .map_err(SyncClientError::from)
                .and_then(|value| {
                    self.senders
                        .broadcast(self.sender_id, scene, object_id, &value)
                        .map_err(SyncClientError::from)
                });
            if let Err(error) = published {
                warn!("Republishing object {} failed: {}", object_id, error);
            }
        }
    }

    /// Releases the held lock, stops the subscriber and flushes every sender
    pub fn shutdown(&mut self) {
        if self.is_syncing() {
            if let Err(error) = self.unlock() {
                debug!("Releasing lock on shutdown failed: {}", error);
            }
        }
        if let Some(mut subscriber) = self.subscriber.take() {
            subscriber.stop();
        }
        self.senders.finish_all();
    }
}

impl Drop for SyncClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}
