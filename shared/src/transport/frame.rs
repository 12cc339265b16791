use std::io::Write;

use crate::transport::error::TransportError;

/// Largest frame accepted off a stream; a full scene buffer fits well below it
pub const MAX_FRAME_LENGTH: usize = 1 << 28;

const LENGTH_PREFIX: usize = 4;

/// Writes `payload` with its u32 little-endian length prefix
pub fn write_frame(stream: &mut impl Write, payload: &[u8]) -> Result<(), TransportError> {
    if payload.len() > MAX_FRAME_LENGTH {
        return Err(TransportError::FrameTooLarge {
            length: payload.len(),
            max: MAX_FRAME_LENGTH,
        });
    }
    let length = payload.len() as u32;
    let mut frame = Vec::with_capacity(LENGTH_PREFIX + payload.len());
    frame.extend_from_slice(&length.to_le_bytes());
    frame.extend_from_slice(payload);
    stream.write_all(&frame).map_err(io_error)?;
    stream.flush().map_err(io_error)
}

/// Reassembles length-prefixed frames from bytes that arrive in arbitrary chunks.
/// Keeping partial frames here lets a socket read time out mid-frame without
/// losing its place in the stream.
#[derive(Default)]
pub struct FrameDecoder {
    pending: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Takes the next complete frame, if one has fully arrived
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        if self.pending.len() < LENGTH_PREFIX {
            return Ok(None);
        }
        let prefix = [
            self.pending[0],
            self.pending[1],
            self.pending[2],
            self.pending[3],
        ];
        let length = u32::from_le_bytes(prefix) as usize;
        if length > MAX_FRAME_LENGTH {
            return Err(TransportError::FrameTooLarge {
                length,
                max: MAX_FRAME_LENGTH,
            });
        }
        if self.pending.len() < LENGTH_PREFIX + length {
            return Ok(None);
        }
        let frame = self.pending[LENGTH_PREFIX..LENGTH_PREFIX + length].to_vec();
        self.pending.drain(..LENGTH_PREFIX + length);
        Ok(Some(frame))
    }

    pub fn buffered(&self) -> usize {
        self.pending.len()
    }
}

pub(crate) fn io_error(error: std::io::Error) -> TransportError {
    use std::io::ErrorKind;
    match error.kind() {
        ErrorKind::BrokenPipe
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::UnexpectedEof
        | ErrorKind::NotConnected => TransportError::SocketClosed,
        _ => TransportError::Io(error.to_string()),
    }
}
