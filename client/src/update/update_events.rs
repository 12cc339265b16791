use scenesync_shared::{LockTransition, ObjectId, ParamType, SenderId, UpdateError};

/// Everything one `tick` did to the local scene
pub struct UpdateEvents {
    applied: Vec<(ObjectId, ParamType)>,
    lock_changes: Vec<(ObjectId, SenderId, LockTransition)>,
    advisory_violations: Vec<(ObjectId, SenderId)>,
    dropped: Vec<UpdateError>,
    echoes: usize,
    pings: usize,
    resend_requested: bool,
    empty: bool,
}

impl Default for UpdateEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateEvents {
    pub(crate) fn new() -> Self {
        Self {
            applied: Vec::new(),
            lock_changes: Vec::new(),
            advisory_violations: Vec::new(),
            dropped: Vec::new(),
            echoes: 0,
            pings: 0,
            resend_requested: false,
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Parameters changed on the scene, in arrival order
    pub fn applied(&self) -> &[(ObjectId, ParamType)] {
        &self.applied
    }

    pub fn lock_changes(&self) -> &[(ObjectId, SenderId, LockTransition)] {
        &self.lock_changes
    }

    /// Edits applied although another sender held the advisory lock
    pub fn advisory_violations(&self) -> &[(ObjectId, SenderId)] {
        &self.advisory_violations
    }

    /// Updates that could not be applied and were skipped
    pub fn dropped(&self) -> &[UpdateError] {
        &self.dropped
    }

    /// Own broadcasts that came back and were ignored
    pub fn echoes(&self) -> usize {
        self.echoes
    }

    pub fn pings(&self) -> usize {
        self.pings
    }

    pub fn resend_requested(&self) -> bool {
        self.resend_requested
    }

    pub(crate) fn push_applied(&mut self, object_id: ObjectId, param_type: ParamType) {
        self.applied.push((object_id, param_type));
        self.empty = false;
    }

    pub(crate) fn push_lock_change(
        &mut self,
        object_id: ObjectId,
        sender_id: SenderId,
        transition: LockTransition,
    ) {
        self.lock_changes.push((object_id, sender_id, transition));
        self.empty = false;
    }

    pub(crate) fn push_advisory_violation(&mut self, object_id: ObjectId, owner: SenderId) {
        self.advisory_violations.push((object_id, owner));
        self.empty = false;
    }

    pub(crate) fn push_dropped(&mut self, error: UpdateError) {
        self.dropped.push(error);
        self.empty = false;
    }

    pub(crate) fn push_echo(&mut self) {
        self.echoes += 1;
        self.empty = false;
    }

    pub(crate) fn push_ping(&mut self) {
        self.pings += 1;
        self.empty = false;
    }

    pub(crate) fn push_resend_request(&mut self) {
        self.resend_requested = true;
        self.empty = false;
    }
}
