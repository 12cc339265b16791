use crate::{byte_counter::ByteCounter, byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr};

/// A type that can be written to and read from a little-endian byte stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Serialize Self to a ByteWrite
    fn ser(&self, writer: &mut dyn ByteWrite);

    /// Parse Self from a ByteReader
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;

    /// Return length of value in bytes
    fn byte_length(&self) -> u32 {
        let mut counter = ByteCounter::new();
        self.ser(&mut counter);
        counter.byte_count()
    }
}

/// A type whose encoded length never varies
pub trait ConstByteLength {
    fn const_byte_length() -> u32;
}
