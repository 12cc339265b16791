/// Upper bound on the capacity `ByteWriter::with_capacity` will pre-allocate.
/// Writers still grow past this, it only caps the up-front reservation.
pub const MAX_RESERVE_BYTES: usize = 16 * 1024 * 1024;
