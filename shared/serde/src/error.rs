use thiserror::Error;

/// Errors raised while reading little-endian records out of a byte buffer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// A read would run past the end of the buffer
    #[error("Unexpected end of buffer: needed {needed} bytes at offset {offset}, but only {remaining} remain")]
    UnexpectedEnd {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A count prefix was negative
    #[error("Negative count {count} at offset {offset}")]
    NegativeCount { offset: usize, count: i32 },

    /// A count prefix declares more data than the buffer holds
    #[error("Count {count} of {element_size}-byte elements at offset {offset} needs {needed} bytes, but only {remaining} remain")]
    CountOutOfBounds {
        offset: usize,
        count: i32,
        element_size: usize,
        needed: usize,
        remaining: usize,
    },

    /// An enum discriminant had no matching variant
    #[error("Invalid {type_name} discriminant {value}")]
    InvalidDiscriminant { type_name: &'static str, value: i32 },
}
