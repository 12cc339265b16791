use crate::update::error::UpdateError;

/// Second byte of a live update frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamType {
    Pos,
    Rot,
    Scale,
    Lock,
    HiddenLock,
    Kinematic,
    Fov,
    Aspect,
    FocusDist,
    FocusSize,
    Aperture,
    Color,
    Intensity,
    Exposure,
    Range,
    Angle,
    BoneAnim,
    /// Reserved by legacy peers, never applied
    VertexAnim,
    Ping,
    ResendUpdate,
}

/// Payload length a parameter type requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSize {
    Exact(usize),
    /// Any whole number of elements of this size
    MultipleOf(usize),
}

impl PayloadSize {
    pub fn accepts(self, length: usize) -> bool {
        match self {
            PayloadSize::Exact(size) => length == size,
            PayloadSize::MultipleOf(size) => length % size == 0,
        }
    }
}

impl ParamType {
    pub const ALL: [ParamType; 20] = [
        ParamType::Pos,
        ParamType::Rot,
        ParamType::Scale,
        ParamType::Lock,
        ParamType::HiddenLock,
        ParamType::Kinematic,
        ParamType::Fov,
        ParamType::Aspect,
        ParamType::FocusDist,
        ParamType::FocusSize,
        ParamType::Aperture,
        ParamType::Color,
        ParamType::Intensity,
        ParamType::Exposure,
        ParamType::Range,
        ParamType::Angle,
        ParamType::BoneAnim,
        ParamType::VertexAnim,
        ParamType::Ping,
        ParamType::ResendUpdate,
    ];

    pub fn to_u8(self) -> u8 {
        match self {
            ParamType::Pos => 0,
            ParamType::Rot => 1,
            ParamType::Scale => 2,
            ParamType::Lock => 3,
            ParamType::HiddenLock => 4,
            ParamType::Kinematic => 5,
            ParamType::Fov => 6,
            ParamType::Aspect => 7,
            ParamType::FocusDist => 8,
            ParamType::FocusSize => 9,
            ParamType::Aperture => 10,
            ParamType::Color => 11,
            ParamType::Intensity => 12,
            ParamType::Exposure => 13,
            ParamType::Range => 14,
            ParamType::Angle => 15,
            ParamType::BoneAnim => 16,
            ParamType::VertexAnim => 17,
            ParamType::Ping => 18,
            ParamType::ResendUpdate => 19,
        }
    }

    pub fn payload_size(self) -> PayloadSize {
        match self {
            ParamType::Pos | ParamType::Scale | ParamType::Color => PayloadSize::Exact(12),
            ParamType::Rot => PayloadSize::Exact(16),
            ParamType::Lock | ParamType::HiddenLock | ParamType::Kinematic => PayloadSize::Exact(1),
            ParamType::Fov
            | ParamType::Aspect
            | ParamType::FocusDist
            | ParamType::FocusSize
            | ParamType::Aperture
            | ParamType::Intensity
            | ParamType::Exposure
            | ParamType::Range
            | ParamType::Angle => PayloadSize::Exact(4),
            ParamType::BoneAnim => PayloadSize::MultipleOf(16),
            ParamType::VertexAnim => PayloadSize::MultipleOf(12),
            ParamType::Ping | ParamType::ResendUpdate => PayloadSize::Exact(0),
        }
    }

    pub fn is_lock(self) -> bool {
        matches!(self, ParamType::Lock | ParamType::HiddenLock)
    }

    /// Liveness and re-sync signals that never touch scene state
    pub fn is_control(self) -> bool {
        matches!(self, ParamType::Ping | ParamType::ResendUpdate)
    }

    /// Whether a relay should remember the latest value for late joiners
    pub fn is_state(self) -> bool {
        !self.is_lock() && !self.is_control()
    }
}

impl TryFrom<u8> for ParamType {
    type Error = UpdateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ParamType::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(UpdateError::UnknownParamType { value })
    }
}
