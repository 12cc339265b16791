use std::collections::HashMap;

use log::{debug, info, warn};

use scenesync_shared::{
    LockCoordinator, LockMode, ObjectId, ParamType, ParameterUpdate, ParameterValue, SenderId,
};

/// Decides what the relay forwards for each published frame and remembers
/// the latest state of every object so late joiners can catch up
pub struct SyncRelay {
    states: HashMap<(ObjectId, ParamType), Vec<u8>>,
    locks: LockCoordinator,
}

impl Default for SyncRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncRelay {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            // the relay only tracks owners, it never refuses a frame
            locks: LockCoordinator::new(LockMode::Advisory),
        }
    }

    /// Frames to broadcast in response to one published frame.
    /// Frames the relay cannot decode are still forwarded untouched, newer
    /// clients may understand them.
    pub fn relay(&mut self, frame: &[u8]) -> Vec<Vec<u8>> {
        let mut outgoing = vec![frame.to_vec()];
        let update = match ParameterUpdate::decode(frame) {
            Ok(update) => update,
            Err(error) => {
                debug!("Relaying undecodable frame uncached: {}", error);
                return outgoing;
            }
        };

        match &update.value {
            ParameterValue::Lock(locked) | ParameterValue::HiddenLock(locked) => {
                if let Err(error) = self
                    .locks
                    .try_set_locked(update.object_id, update.sender_id, *locked)
                {
                    warn!("Lock frame from sender {}: {}", update.sender_id, error);
                }
            }
            ParameterValue::ResendUpdate => {
                info!(
                    "Sender {} requested a resend, replaying {} cached states",
                    update.sender_id,
                    self.states.len()
                );
                outgoing.extend(self.replay());
            }
            ParameterValue::Ping => {}
            _ => {
                self.states
                    .insert((update.object_id, update.param_type()), frame.to_vec());
            }
        }
        outgoing
    }

    /// Cached state frames, ordered by object then parameter
    pub fn replay(&self) -> Vec<Vec<u8>> {
        let mut keys: Vec<_> = self.states.keys().copied().collect();
        keys.sort_unstable();
        keys.into_iter()
            .filter_map(|key| self.states.get(&key).cloned())
            .collect()
    }

    /// Unlock frames for every lock a departed sender still held
    pub fn release_sender(&mut self, sender_id: SenderId) -> Vec<Vec<u8>> {
        let released = match self.locks.try_release_owner(sender_id) {
            Ok(released) => released,
            Err(error) => {
                warn!("Releasing locks of sender {} failed: {}", sender_id, error);
                return Vec::new();
            }
        };
        if !released.is_empty() {
            info!("Released {} locks held by departed sender {}", released.len(), sender_id);
        }
        released
            .into_iter()
            .map(|object_id| {
                ParameterUpdate::new(sender_id, object_id, ParameterValue::Lock(false)).encode()
            })
            .collect()
    }

    pub fn cached_state(&self, object_id: ObjectId, param_type: ParamType) -> Option<&[u8]> {
        self.states.get(&(object_id, param_type)).map(Vec::as_slice)
    }

    pub fn cached_states(&self) -> usize {
        self.states.len()
    }

    pub fn locks(&self) -> &LockCoordinator {
        &self.locks
    }

    /// Forgets cached states and locks, for when a new scene is served
    pub fn clear(&mut self) {
        self.states.clear();
        if let Err(error) = self.locks.try_clear() {
            warn!("Clearing relay locks failed: {}", error);
        }
    }
}
