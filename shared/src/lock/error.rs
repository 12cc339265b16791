use thiserror::Error;

use crate::types::{ObjectId, SenderId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// A thread panicked while holding the lock table
    #[error("Lock table is poisoned")]
    LockPoisoned,

    /// Strict mode refused a lock request on an object someone else holds
    #[error("Object {object_id} is locked by sender {owner}, sender {requester} cannot lock it")]
    HeldByOther {
        object_id: ObjectId,
        owner: SenderId,
        requester: SenderId,
    },

    /// Only the owner may release a lock
    #[error("Object {object_id} is locked by sender {owner}, sender {requester} cannot unlock it")]
    NotOwner {
        object_id: ObjectId,
        owner: SenderId,
        requester: SenderId,
    },
}
