use std::fmt;

use scenesync_serde::{ByteReader, ByteWrite, ConstByteLength, Serde, SerdeErr};

use crate::constants::NODE_NAME_LENGTH;

/// Fixed-width node name, NUL padded on the wire
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeName([u8; NODE_NAME_LENGTH]);

impl NodeName {
    /// Builds a name from `name`, truncating anything past 64 bytes
    pub fn new(name: &str) -> Self {
        let mut bytes = [0u8; NODE_NAME_LENGTH];
        let source = name.as_bytes();
        let length = source.len().min(NODE_NAME_LENGTH);
        bytes[..length].copy_from_slice(&source[..length]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; NODE_NAME_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NODE_NAME_LENGTH] {
        &self.0
    }

    /// The name with trailing NUL and space padding removed
    pub fn as_string(&self) -> String {
        let end = self
            .0
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(NODE_NAME_LENGTH);
        String::from_utf8_lossy(&self.0[..end])
            .trim_end_matches(' ')
            .to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.as_string().is_empty()
    }
}

impl Default for NodeName {
    fn default() -> Self {
        Self([0u8; NODE_NAME_LENGTH])
    }
}

impl fmt::Debug for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeName({:?})", self.as_string())
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<&str> for NodeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Serde for NodeName {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_bytes(&self.0);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self(reader.read_array::<NODE_NAME_LENGTH>()?))
    }

    fn byte_length(&self) -> u32 {
        Self::const_byte_length()
    }
}

impl ConstByteLength for NodeName {
    fn const_byte_length() -> u32 {
        NODE_NAME_LENGTH as u32
    }
}
