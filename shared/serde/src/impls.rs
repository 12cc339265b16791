use crate::{
    byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr, serde::Serde,
    ConstByteLength,
};

// Unsigned byte

impl Serde for u8 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_byte()
    }

    fn byte_length(&self) -> u32 {
        1
    }
}

impl ConstByteLength for u8 {
    fn const_byte_length() -> u32 {
        1
    }
}

// Boolean, one byte on the wire, any non-zero value reads as true

impl Serde for bool {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_byte(u8::from(*self));
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(reader.read_byte()? != 0)
    }

    fn byte_length(&self) -> u32 {
        1
    }
}

impl ConstByteLength for bool {
    fn const_byte_length() -> u32 {
        1
    }
}

// 32-bit numbers

impl Serde for i32 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_bytes(&self.to_le_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_i32()
    }

    fn byte_length(&self) -> u32 {
        4
    }
}

impl ConstByteLength for i32 {
    fn const_byte_length() -> u32 {
        4
    }
}

impl Serde for f32 {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        writer.write_bytes(&self.to_le_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_f32()
    }

    fn byte_length(&self) -> u32 {
        4
    }
}

impl ConstByteLength for f32 {
    fn const_byte_length() -> u32 {
        4
    }
}

// Fixed arrays

impl<T: Serde, const N: usize> Serde for [T; N] {
    fn ser(&self, writer: &mut dyn ByteWrite) {
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::de(reader)?);
        }
        match items.try_into() {
            Ok(array) => Ok(array),
            // exactly N items were pushed above
            Err(_) => unreachable!("array length mismatch"),
        }
    }

    fn byte_length(&self) -> u32 {
        self.iter().map(Serde::byte_length).sum()
    }
}

impl<T: ConstByteLength, const N: usize> ConstByteLength for [T; N] {
    fn const_byte_length() -> u32 {
        T::const_byte_length() * N as u32
    }
}
