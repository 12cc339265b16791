use scenesync_serde::{read_items, write_items, ByteReader, ByteWrite, Serde, SerdeErr};

use crate::{
    scene::scene_data::SceneData,
    types::ObjectId,
    update::{error::UpdateError, param_type::ParamType},
};

/// Typed payload of a live update
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Position([f32; 3]),
    Rotation([f32; 4]),
    Scale([f32; 3]),
    Lock(bool),
    HiddenLock(bool),
    Kinematic(bool),
    Fov(f32),
    Aspect(f32),
    FocusDist(f32),
    FocusSize(f32),
    Aperture(f32),
    Color([f32; 3]),
    Intensity(f32),
    Exposure(f32),
    Range(f32),
    Angle(f32),
    /// One quaternion per bone; legacy peers always send 25
    BoneAnim(Vec<[f32; 4]>),
    Ping,
    ResendUpdate,
}

impl ParameterValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            ParameterValue::Position(_) => ParamType::Pos,
            ParameterValue::Rotation(_) => ParamType::Rot,
            ParameterValue::Scale(_) => ParamType::Scale,
            ParameterValue::Lock(_) => ParamType::Lock,
            ParameterValue::HiddenLock(_) => ParamType::HiddenLock,
            ParameterValue::Kinematic(_) => ParamType::Kinematic,
            ParameterValue::Fov(_) => ParamType::Fov,
            ParameterValue::Aspect(_) => ParamType::Aspect,
            ParameterValue::FocusDist(_) => ParamType::FocusDist,
            ParameterValue::FocusSize(_) => ParamType::FocusSize,
            ParameterValue::Aperture(_) => ParamType::Aperture,
            ParameterValue::Color(_) => ParamType::Color,
            ParameterValue::Intensity(_) => ParamType::Intensity,
            ParameterValue::Exposure(_) => ParamType::Exposure,
            ParameterValue::Range(_) => ParamType::Range,
            ParameterValue::Angle(_) => ParamType::Angle,
            ParameterValue::BoneAnim(_) => ParamType::BoneAnim,
            ParameterValue::Ping => ParamType::Ping,
            ParameterValue::ResendUpdate => ParamType::ResendUpdate,
        }
    }

    /// Lock state carried by LOCK or HIDDENLOCK
    pub fn lock_state(&self) -> Option<bool> {
        match self {
            ParameterValue::Lock(locked) | ParameterValue::HiddenLock(locked) => Some(*locked),
            _ => None,
        }
    }

    pub fn write_payload(&self, writer: &mut dyn ByteWrite) {
        match self {
            ParameterValue::Position(value)
            | ParameterValue::Scale(value)
            | ParameterValue::Color(value) => value.ser(writer),
            ParameterValue::Rotation(value) => value.ser(writer),
            ParameterValue::Lock(value)
            | ParameterValue::HiddenLock(value)
            | ParameterValue::Kinematic(value) => value.ser(writer),
            ParameterValue::Fov(value)
            | ParameterValue::Aspect(value)
            | ParameterValue::FocusDist(value)
            | ParameterValue::FocusSize(value)
            | ParameterValue::Aperture(value)
            | ParameterValue::Intensity(value)
            | ParameterValue::Exposure(value)
            | ParameterValue::Range(value)
            | ParameterValue::Angle(value) => value.ser(writer),
            ParameterValue::BoneAnim(bones) => write_items(writer, bones),
            ParameterValue::Ping | ParameterValue::ResendUpdate => {}
        }
    }

    /// Parses a payload whose length has not been checked yet
    pub fn read_payload(param_type: ParamType, payload: &[u8]) -> Result<Self, UpdateError> {
        if param_type == ParamType::VertexAnim {
            return Err(UpdateError::UnsupportedParamType { param_type });
        }
        if !param_type.payload_size().accepts(payload.len()) {
            return Err(UpdateError::PayloadSize {
                param_type,
                actual: payload.len(),
            });
        }

        let mut reader = ByteReader::new(payload);
        Self::read_checked(param_type, &mut reader).map_err(|_| UpdateError::PayloadSize {
            param_type,
            actual: payload.len(),
        })
    }

    fn read_checked(param_type: ParamType, reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let value = match param_type {
            ParamType::Pos => ParameterValue::Position(Serde::de(reader)?),
            ParamType::Rot => ParameterValue::Rotation(Serde::de(reader)?),
            ParamType::Scale => ParameterValue::Scale(Serde::de(reader)?),
            ParamType::Lock => ParameterValue::Lock(bool::de(reader)?),
            ParamType::HiddenLock => ParameterValue::HiddenLock(bool::de(reader)?),
            ParamType::Kinematic => ParameterValue::Kinematic(bool::de(reader)?),
            ParamType::Fov => ParameterValue::Fov(reader.read_f32()?),
            ParamType::Aspect => ParameterValue::Aspect(reader.read_f32()?),
            ParamType::FocusDist => ParameterValue::FocusDist(reader.read_f32()?),
            ParamType::FocusSize => ParameterValue::FocusSize(reader.read_f32()?),
            ParamType::Aperture => ParameterValue::Aperture(reader.read_f32()?),
            ParamType::Color => ParameterValue::Color(Serde::de(reader)?),
            ParamType::Intensity => ParameterValue::Intensity(reader.read_f32()?),
            ParamType::Exposure => ParameterValue::Exposure(reader.read_f32()?),
            ParamType::Range => ParameterValue::Range(reader.read_f32()?),
            ParamType::Angle => ParameterValue::Angle(reader.read_f32()?),
            ParamType::BoneAnim => {
                let bones = reader.remaining() / 16;
                ParameterValue::BoneAnim(read_items(reader, bones)?)
            }
            ParamType::Ping => ParameterValue::Ping,
            ParamType::ResendUpdate => ParameterValue::ResendUpdate,
            ParamType::VertexAnim => {
                return Err(SerdeErr::InvalidDiscriminant {
                    type_name: "ParamType",
                    value: i32::from(param_type.to_u8()),
                })
            }
        };
        Ok(value)
    }

    /// Current value of `param_type` on an object, for publishing it
    pub fn read_from(
        scene: &SceneData,
        object_id: ObjectId,
        param_type: ParamType,
    ) -> Result<Self, UpdateError> {
        let node = scene.node(object_id).ok_or(UpdateError::UnknownObjectId {
            object_id,
            node_count: scene.node_count(),
        })?;
        let live = scene.live_state(object_id).cloned().unwrap_or_default();
        let not_applicable = || UpdateError::NotApplicable {
            param_type,
            object_id,
            node_type: node.node_type(),
        };

        let value = match param_type {
            ParamType::Pos => ParameterValue::Position(node.common().position),
            ParamType::Rot => ParameterValue::Rotation(node.common().rotation),
            ParamType::Scale => ParameterValue::Scale(node.common().scale),
            ParamType::Lock => ParameterValue::Lock(live.physics_suspended),
            ParamType::HiddenLock => ParameterValue::HiddenLock(live.hidden_lock),
            ParamType::Kinematic => ParameterValue::Kinematic(live.kinematic),
            ParamType::Fov => ParameterValue::Fov(node.camera().ok_or_else(not_applicable)?.fov),
            ParamType::Aspect => {
                ParameterValue::Aspect(node.camera().ok_or_else(not_applicable)?.aspect)
            }
            ParamType::FocusDist => {
                ParameterValue::FocusDist(node.camera().ok_or_else(not_applicable)?.focal_dist)
            }
            ParamType::FocusSize => {
                node.camera().ok_or_else(not_applicable)?;
                ParameterValue::FocusSize(live.focus_size)
            }
            ParamType::Aperture => {
                ParameterValue::Aperture(node.camera().ok_or_else(not_applicable)?.aperture)
            }
            ParamType::Color => match (node.light(), node.geo()) {
                (Some(light), _) => ParameterValue::Color(light.color),
                (None, Some(geo)) => {
                    ParameterValue::Color([geo.color[0], geo.color[1], geo.color[2]])
                }
                (None, None) => return Err(not_applicable()),
            },
            ParamType::Intensity => {
                ParameterValue::Intensity(node.light().ok_or_else(not_applicable)?.intensity)
            }
            ParamType::Exposure => {
                node.light().ok_or_else(not_applicable)?;
                ParameterValue::Exposure(live.exposure)
            }
            ParamType::Range => ParameterValue::Range(node.light().ok_or_else(not_applicable)?.range),
            ParamType::Angle => ParameterValue::Angle(node.light().ok_or_else(not_applicable)?.angle),
            ParamType::BoneAnim => ParameterValue::BoneAnim(live.bone_rotations),
            ParamType::Ping => ParameterValue::Ping,
            ParamType::ResendUpdate => ParameterValue::ResendUpdate,
            ParamType::VertexAnim => return Err(UpdateError::UnsupportedParamType { param_type }),
        };
        Ok(value)
    }
}
