use log::warn;

use crate::{
    lock::lock_coordinator::{EditPermission, LockCoordinator, LockTransition},
    scene::{
        node::SceneNode,
        scene_data::{LiveState, SceneData},
    },
    types::{ObjectId, SenderId},
    update::{
        error::UpdateError, param_type::ParamType, parameter_update::ParameterUpdate,
        parameter_value::ParameterValue,
    },
};

/// What applying one update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Applied although another sender holds the advisory lock
    AppliedDespiteLock { owner: SenderId },
    /// Our own broadcast coming back, scene state left alone
    EchoSuppressed,
    LockChanged(LockTransition),
    /// PING or RESENDUPDATE, nothing to mutate
    Control(ParamType),
}

/// Applies live updates to a scene snapshot.
/// Holds the local sender ID for echo suppression and a handle onto the
/// shared lock table.
#[derive(Clone)]
pub struct UpdateApplier {
    local_id: SenderId,
    locks: LockCoordinator,
}

impl UpdateApplier {
    pub fn new(local_id: SenderId, locks: LockCoordinator) -> Self {
        Self { local_id, locks }
    }

    pub fn local_id(&self) -> SenderId {
        self.local_id
    }

    pub fn locks(&self) -> &LockCoordinator {
        &self.locks
    }

    /// Decode and apply one frame off the update bus
    pub fn apply_frame(&self, scene: &mut SceneData, frame: &[u8]) -> Result<ApplyOutcome, UpdateError> {
        let update = ParameterUpdate::decode(frame)?;
        self.apply(scene, &update)
    }

    /// Apply an update received from the bus
    pub fn apply(&self, scene: &mut SceneData, update: &ParameterUpdate) -> Result<ApplyOutcome, UpdateError> {
        let ParameterUpdate {
            sender_id,
            object_id,
            value,
        } = update;
        let (sender_id, object_id) = (*sender_id, *object_id);

        if value.param_type().is_control() {
            return Ok(ApplyOutcome::Control(value.param_type()));
        }
        check_object(scene, object_id)?;

        if let Some(locked) = value.lock_state() {
            // lock bookkeeping follows every sender, our own echo included
            let transition = self.locks.try_set_locked(object_id, sender_id, locked)?;
            if sender_id != self.local_id {
                set_value(scene, object_id, value)?;
            }
            return Ok(ApplyOutcome::LockChanged(transition));
        }

        if sender_id == self.local_id {
            return Ok(ApplyOutcome::EchoSuppressed);
        }

        self.edit(scene, object_id, sender_id, value)
    }

    /// Apply an edit made by this participant
    pub fn apply_local(
        &self,
        scene: &mut SceneData,
        object_id: ObjectId,
        value: &ParameterValue,
    ) -> Result<ApplyOutcome, UpdateError> {
        if value.param_type().is_control() {
            return Ok(ApplyOutcome::Control(value.param_type()));
        }
        check_object(scene, object_id)?;

        if let Some(locked) = value.lock_state() {
            let transition = self.locks.try_set_locked(object_id, self.local_id, locked)?;
            set_value(scene, object_id, value)?;
            return Ok(ApplyOutcome::LockChanged(transition));
        }

        self.edit(scene, object_id, self.local_id, value)
    }

    fn edit(
        &self,
        scene: &mut SceneData,
        object_id: ObjectId,
        editor: SenderId,
        value: &ParameterValue,
    ) -> Result<ApplyOutcome, UpdateError> {
        match self.locks.try_check_edit(object_id, editor)? {
            EditPermission::Rejected { owner } => Err(UpdateError::LockRejected {
                object_id,
                owner,
                editor,
            }),
            EditPermission::AdvisoryViolation { owner } => {
                set_value(scene, object_id, value)?;
                warn!(
                    "Advisory lock violation: sender {} changed {:?} of object {} locked by sender {}",
                    editor,
                    value.param_type(),
                    object_id,
                    owner
                );
                Ok(ApplyOutcome::AppliedDespiteLock { owner })
            }
            EditPermission::Unlocked | EditPermission::OwnedByEditor => {
                set_value(scene, object_id, value)?;
                Ok(ApplyOutcome::Applied)
            }
        }
    }
}

fn check_object(scene: &SceneData, object_id: ObjectId) -> Result<(), UpdateError> {
    if scene.contains(object_id) {
        Ok(())
    } else {
        Err(UpdateError::UnknownObjectId {
            object_id,
            node_count: scene.node_count(),
        })
    }
}

// Dispatch table from parameter to the field it drives
fn set_value(scene: &mut SceneData, object_id: ObjectId, value: &ParameterValue) -> Result<(), UpdateError> {
    let node_count = scene.node_count();
    let (node, live) = scene
        .object_mut(object_id)
        .ok_or(UpdateError::UnknownObjectId {
            object_id,
            node_count,
        })?;
    let not_applicable = |node: &SceneNode| UpdateError::NotApplicable {
        param_type: value.param_type(),
        object_id,
        node_type: node.node_type(),
    };

    match value {
        ParameterValue::Position(position) => node.common_mut().position = *position,
        ParameterValue::Rotation(rotation) => node.common_mut().rotation = *rotation,
        ParameterValue::Scale(scale) => node.common_mut().scale = *scale,
        ParameterValue::Lock(locked) => set_lock(live, *locked, false),
        ParameterValue::HiddenLock(locked) => set_lock(live, *locked, true),
        ParameterValue::Kinematic(kinematic) => live.kinematic = *kinematic,
        ParameterValue::Fov(fov) => match node.camera_mut() {
            Some(camera) => camera.fov = *fov,
            None => return Err(not_applicable(node)),
        },
        ParameterValue::Aspect(aspect) => match node.camera_mut() {
            Some(camera) => camera.aspect = *aspect,
            None => return Err(not_applicable(node)),
        },
        ParameterValue::FocusDist(distance) => match node.camera_mut() {
            Some(camera) => camera.focal_dist = *distance,
            None => return Err(not_applicable(node)),
        },
        ParameterValue::Aperture(aperture) => match node.camera_mut() {
            Some(camera) => camera.aperture = *aperture,
            None => return Err(not_applicable(node)),
        },
        ParameterValue::FocusSize(size) => {
            if node.camera().is_none() {
                return Err(not_applicable(node));
            }
            live.focus_size = *size;
        }
        ParameterValue::Color(color) => {
            if let Some(light) = node.light_mut() {
                light.color = *color;
            } else if let Some(geo) = node.geo_mut() {
                geo.color[..3].copy_from_slice(color);
            } else {
                return Err(not_applicable(node));
            }
        }
        ParameterValue::Intensity(intensity) => match node.light_mut() {
            Some(light) => light.intensity = *intensity,
            None => return Err(not_applicable(node)),
        },
        ParameterValue::Range(range) => match node.light_mut() {
            Some(light) => light.range = *range,
            None => return Err(not_applicable(node)),
        },
        ParameterValue::Angle(angle) => match node.light_mut() {
            Some(light) => light.angle = *angle,
            None => return Err(not_applicable(node)),
        },
        ParameterValue::Exposure(exposure) => {
            if node.light().is_none() {
                return Err(not_applicable(node));
            }
            live.exposure = *exposure;
        }
        ParameterValue::BoneAnim(bones) => live.bone_rotations.clone_from(bones),
        ParameterValue::Ping | ParameterValue::ResendUpdate => {}
    }
    Ok(())
}

fn set_lock(live: &mut LiveState, locked: bool, hidden: bool) {
    live.physics_suspended = locked;
    live.hidden_lock = locked && hidden;
}
