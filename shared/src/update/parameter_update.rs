use scenesync_serde::{ByteWriter, Serde};

use crate::{
    types::{ObjectId, SenderId},
    update::{error::UpdateError, param_type::ParamType, parameter_value::ParameterValue},
};

/// Bytes before the payload: sender, parameter type, little-endian object ID
pub const FRAME_HEADER_SIZE: usize = 6;

/// The fixed prefix of a live update frame, readable even when the payload
/// or parameter type is not understood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub sender_id: SenderId,
    /// Raw parameter type byte, possibly outside the known range
    pub param_type: u8,
    pub object_id: ObjectId,
}

impl FrameHeader {
    pub fn parse(frame: &[u8]) -> Result<Self, UpdateError> {
        if frame.len() < FRAME_HEADER_SIZE {
            return Err(UpdateError::FrameTooShort {
                length: frame.len(),
            });
        }
        Ok(Self {
            sender_id: frame[0],
            param_type: frame[1],
            object_id: i32::from_le_bytes([frame[2], frame[3], frame[4], frame[5]]),
        })
    }

    pub fn param_type(&self) -> Result<ParamType, UpdateError> {
        ParamType::try_from(self.param_type)
    }
}

/// One live parameter delta
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterUpdate {
    pub sender_id: SenderId,
    pub object_id: ObjectId,
    pub value: ParameterValue,
}

impl ParameterUpdate {
    pub fn new(sender_id: SenderId, object_id: ObjectId, value: ParameterValue) -> Self {
        Self {
            sender_id,
            object_id,
            value,
        }
    }

    pub fn param_type(&self) -> ParamType {
        self.value.param_type()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(FRAME_HEADER_SIZE + 16);
        self.sender_id.ser(&mut writer);
        self.param_type().to_u8().ser(&mut writer);
        self.object_id.ser(&mut writer);
        self.value.write_payload(&mut writer);
        writer.to_bytes()
    }

    pub fn decode(frame: &[u8]) -> Result<Self, UpdateError> {
        let header = FrameHeader::parse(frame)?;
        let param_type = header.param_type()?;
        let value = ParameterValue::read_payload(param_type, &frame[FRAME_HEADER_SIZE..])?;
        Ok(Self {
            sender_id: header.sender_id,
            object_id: header.object_id,
            value,
        })
    }
}
