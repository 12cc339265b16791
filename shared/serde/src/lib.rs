//! # Scenesync Serde
//! Little-endian, byte-aligned serialization for the scenesync wire formats.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod byte_counter;
mod byte_reader;
mod byte_writer;
mod constants;
mod error;
mod impls;
mod list;
mod serde;

pub use byte_counter::ByteCounter;
pub use byte_reader::ByteReader;
pub use byte_writer::{ByteWrite, ByteWriter};
pub use constants::MAX_RESERVE_BYTES;
pub use error::SerdeErr;
pub use list::{read_counted, read_items, write_count, write_counted, write_items};
pub use serde::{ConstByteLength, Serde};
