use crate::{
    byte_reader::ByteReader, byte_writer::ByteWrite, error::SerdeErr, serde::Serde,
    ConstByteLength,
};

/// Writes an i32 count followed by each element.
///
/// # Panics
///
/// Panics if `items` holds more than `i32::MAX` elements.
pub fn write_counted<T: Serde>(writer: &mut dyn ByteWrite, items: &[T]) {
    write_count(writer, items.len());
    write_items(writer, items);
}

/// Writes elements without a count prefix
pub fn write_items<T: Serde>(writer: &mut dyn ByteWrite, items: &[T]) {
    for item in items {
        item.ser(writer);
    }
}

/// Writes `count` as an i32 prefix.
///
/// # Panics
///
/// Panics if `count` does not fit in an i32.
pub fn write_count(writer: &mut dyn ByteWrite, count: usize) {
    let count = i32::try_from(count).expect("record count exceeds i32::MAX");
    count.ser(writer);
}

/// Reads an i32 count prefix, then that many elements
pub fn read_counted<T: Serde + ConstByteLength>(reader: &mut ByteReader) -> Result<Vec<T>, SerdeErr> {
    let count = reader.read_count(T::const_byte_length() as usize)?;
    read_items(reader, count)
}

/// Reads `count` elements whose count was taken from an earlier prefix
pub fn read_items<T: Serde + ConstByteLength>(
    reader: &mut ByteReader,
    count: usize,
) -> Result<Vec<T>, SerdeErr> {
    let element_size = T::const_byte_length() as usize;
    let remaining = reader.remaining();
    // SECURITY: check before allocating, the count came off the wire
    match count.checked_mul(element_size) {
        Some(needed) if needed <= remaining => {}
        needed => {
            return Err(SerdeErr::CountOutOfBounds {
                offset: reader.position(),
                count: i32::try_from(count).unwrap_or(i32::MAX),
                element_size,
                needed: needed.unwrap_or(usize::MAX),
                remaining,
            })
        }
    }

    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(T::de(reader)?);
    }
    Ok(items)
}
