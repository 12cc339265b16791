use crate::error::SerdeErr;

/// Cursor over a borrowed byte buffer.
/// Every read is bounds checked and reports `SerdeErr` instead of panicking,
/// since buffers arrive from the network.
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// True while at least one full record may still follow.
    /// A single trailing byte is treated as padding.
    pub fn has_record(&self) -> bool {
        self.remaining() > 1
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.remaining();
        if length > remaining {
            return Err(SerdeErr::UnexpectedEnd {
                offset: self.cursor,
                needed: length,
                remaining,
            });
        }
        let bytes = &self.buffer[self.cursor..self.cursor + length];
        self.cursor += length;
        Ok(bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let bytes = self.read_bytes(N)?;
        let mut output = [0u8; N];
        output.copy_from_slice(bytes);
        Ok(output)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    pub fn read_i32(&mut self) -> Result<i32, SerdeErr> {
        Ok(i32::from_le_bytes(self.read_array::<4>()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, SerdeErr> {
        Ok(f32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads an i32 count prefix for `element_size`-byte elements and checks
    /// that the declared elements fit in the rest of the buffer.
    pub fn read_count(&mut self, element_size: usize) -> Result<usize, SerdeErr> {
        let offset = self.cursor;
        let count = self.read_i32()?;
        if count < 0 {
            return Err(SerdeErr::NegativeCount { offset, count });
        }
        let remaining = self.remaining();
        // SECURITY: a hostile count must not drive a huge allocation
        let needed = (count as usize).checked_mul(element_size);
        match needed {
            Some(needed) if needed <= remaining => Ok(count as usize),
            _ => Err(SerdeErr::CountOutOfBounds {
                offset,
                count,
                element_size,
                needed: needed.unwrap_or(usize::MAX),
                remaining,
            }),
        }
    }
}
