//! Legacy sentinel framing.
//!
//! The hixie drafts frame text between a `0x00` start byte and a `0xFF`
//! end byte; no binary framing exists in this mode. The two-byte sequence
//! `0xFF 0x00` is the closing handshake.

use super::{Fin, Frame, OpCode};
use crate::error::FrameError;

/// Start of a text frame.
const TEXT_START: u8 = 0x00;

/// End of a text frame, also the first byte of the closing handshake.
const TEXT_END: u8 = 0xff;

/// The closing handshake.
pub const CLOSING_HANDSHAKE: [u8; 2] = [0xff, 0x00];

/// Wrap an outgoing payload between the text sentinels.
pub(super) fn encode(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 2);
    out.push(TEXT_START);
    out.extend_from_slice(payload);
    out.push(TEXT_END);
    out
}

/// Decode one frame from the front of `buf`.
///
/// A text frame is complete once its end sentinel arrives; the closing
/// handshake decodes as a close frame. Any other leading byte is fatal.
pub(super) fn decode(buf: &[u8]) -> Result<Option<Frame>, FrameError> {
    let first = match buf.first() {
        Some(b) => *b,
        None => return Ok(None),
    };

    match first {
        TEXT_START => {
            let end = match buf.iter().position(|&b| b == TEXT_END) {
                Some(i) => i,
                None => return Ok(None),
            };
            Ok(Some(Frame::new(
                Fin::Y,
                OpCode::Text,
                buf[1..end].to_vec(),
                end + 1,
            )))
        }
        TEXT_END => {
            let second = match buf.get(1) {
                Some(b) => *b,
                None => return Ok(None),
            };
            if second != CLOSING_HANDSHAKE[1] {
                return Err(FrameError::BadCloseHandshake(second));
            }
            Ok(Some(Frame::new(Fin::Y, OpCode::Close, Vec::new(), 2)))
        }
        b => Err(FrameError::UnknownFrameType(b)),
    }
}
