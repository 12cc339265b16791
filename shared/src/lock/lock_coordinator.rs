use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use log::warn;

use crate::{
    lock::{error::LockError, lock_mode::LockMode},
    types::{ObjectId, SenderId},
};

/// Result of a successful lock or unlock request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockTransition {
    Acquired,
    AlreadyHeld,
    /// Advisory mode handed a held lock to a new owner
    TakenOver { previous: SenderId },
    Released,
    NotLocked,
}

/// Whether an edit from some sender may be applied to an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPermission {
    Unlocked,
    OwnedByEditor,
    /// Locked by someone else, applied anyway because the lock is advisory
    AdvisoryViolation { owner: SenderId },
    /// Locked by someone else and refused
    Rejected { owner: SenderId },
}

impl EditPermission {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, EditPermission::Rejected { .. })
    }
}

/// Per-object lock table, shared by the update thread and local edit path.
/// Cloning yields another handle onto the same table.
#[derive(Clone)]
pub struct LockCoordinator {
    mode: LockMode,
    owners: Arc<RwLock<HashMap<ObjectId, SenderId>>>,
}

impl LockCoordinator {
    pub fn new(mode: LockMode) -> Self {
        Self {
            mode,
            owners: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Lock `object_id` for `owner`
    ///
    /// In strict mode, returns an error if another sender holds the lock.
    pub fn try_lock(&self, object_id: ObjectId, owner: SenderId) -> Result<LockTransition, LockError> {
        let mut owners = self.owners.write().map_err(|_| LockError::LockPoisoned)?;
        match owners.get(&object_id).copied() {
            None => {
                owners.insert(object_id, owner);
                Ok(LockTransition::Acquired)
            }
            Some(current) if current == owner => Ok(LockTransition::AlreadyHeld),
            Some(current) => match self.mode {
                LockMode::Advisory => {
                    warn!(
                        "Sender {} took the lock on object {} held by sender {}",
                        owner, object_id, current
                    );
                    owners.insert(object_id, owner);
                    Ok(LockTransition::TakenOver { previous: current })
                }
                LockMode::Strict => Err(LockError::HeldByOther {
                    object_id,
                    owner: current,
                    requester: owner,
                }),
            },
        }
    }

    /// Release `object_id` on behalf of `owner`
    ///
    /// Returns an error if another sender holds the lock.
    pub fn try_unlock(&self, object_id: ObjectId, owner: SenderId) -> Result<LockTransition, LockError> {
        let mut owners = self.owners.write().map_err(|_| LockError::LockPoisoned)?;
        match owners.get(&object_id).copied() {
            None => Ok(LockTransition::NotLocked),
            Some(current) if current == owner => {
                owners.remove(&object_id);
                Ok(LockTransition::Released)
            }
            Some(current) => Err(LockError::NotOwner {
                object_id,
                owner: current,
                requester: owner,
            }),
        }
    }

    /// Lock or unlock, as carried by a LOCK update
    pub fn try_set_locked(
        &self,
        object_id: ObjectId,
        owner: SenderId,
        locked: bool,
    ) -> Result<LockTransition, LockError> {
        if locked {
            self.try_lock(object_id, owner)
        } else {
            self.try_unlock(object_id, owner)
        }
    }

    /// Get the owner of `object_id` (panicking version)
    ///
    /// # Panics
    ///
    /// Panics if the lock table is poisoned.
    /// Consider using `try_owner` for non-panicking error handling.
    pub fn owner(&self, object_id: ObjectId) -> Option<SenderId> {
        self.try_owner(object_id)
            .expect("Lock table poisoned by a panicking thread")
    }

    /// Get the owner of `object_id` (non-panicking version)
    pub fn try_owner(&self, object_id: ObjectId) -> Result<Option<SenderId>, LockError> {
        let owners = self.owners.read().map_err(|_| LockError::LockPoisoned)?;
        Ok(owners.get(&object_id).copied())
    }

    pub fn try_is_locked(&self, object_id: ObjectId) -> Result<bool, LockError> {
        Ok(self.try_owner(object_id)?.is_some())
    }

    /// Decide whether `editor` may change `object_id`
    pub fn try_check_edit(
        &self,
        object_id: ObjectId,
        editor: SenderId,
    ) -> Result<EditPermission, LockError> {
        let permission = match self.try_owner(object_id)? {
            None => EditPermission::Unlocked,
            Some(owner) if owner == editor => EditPermission::OwnedByEditor,
            Some(owner) => match self.mode {
                LockMode::Advisory => EditPermission::AdvisoryViolation { owner },
                LockMode::Strict => EditPermission::Rejected { owner },
            },
        };
        Ok(permission)
    }

    /// Drop every lock held by `owner`, e.g. once it disconnects
    pub fn try_release_owner(&self, owner: SenderId) -> Result<Vec<ObjectId>, LockError> {
        let mut owners = self.owners.write().map_err(|_| LockError::LockPoisoned)?;
        let mut released: Vec<ObjectId> = owners
            .iter()
            .filter(|(_, holder)| **holder == owner)
            .map(|(object_id, _)| *object_id)
            .collect();
        released.sort_unstable();
        for object_id in &released {
            owners.remove(object_id);
        }
        Ok(released)
    }

    /// Sorted snapshot of every held lock
    pub fn try_locked_objects(&self) -> Result<Vec<(ObjectId, SenderId)>, LockError> {
        let owners = self.owners.read().map_err(|_| LockError::LockPoisoned)?;
        let mut locked: Vec<(ObjectId, SenderId)> =
            owners.iter().map(|(object_id, owner)| (*object_id, *owner)).collect();
        locked.sort_unstable();
        Ok(locked)
    }

    /// Forget every lock, used when the scene is reset
    pub fn try_clear(&self) -> Result<(), LockError> {
        let mut owners = self.owners.write().map_err(|_| LockError::LockPoisoned)?;
        owners.clear();
        Ok(())
    }
}

impl Default for LockCoordinator {
    fn default() -> Self {
        Self::new(LockMode::default())
    }
}
