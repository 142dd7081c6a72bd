//! Fragment reassembly.

use crate::error::FrameError;
use crate::frame::{Frame, OpCode};

/// Reassembles decoded frames into complete logical payloads.
///
/// The pending list is non-empty exactly between a non-final frame and the
/// final continuation that completes it. A continuation with no open
/// message, or a fresh frame interleaved with an open one, fails the
/// connection.
#[derive(Debug, Default)]
pub struct Reassembler {
    pending: Vec<Frame>,
}

impl Reassembler {
    #[inline]
    pub const fn new() -> Self { Self { pending: Vec::new() } }

    /// Whether a fragmented message is currently open.
    #[inline]
    pub fn is_assembling(&self) -> bool { !self.pending.is_empty() }

    /// Feed one decoded frame.
    ///
    /// Returns the completed payload, tagged with the opcode of the first
    /// fragment, when the frame ends a logical message.
    pub fn push(&mut self, frame: Frame) -> Result<Option<(OpCode, Vec<u8>)>, FrameError> {
        if frame.opcode == OpCode::Continuation {
            if self.pending.is_empty() {
                return Err(FrameError::UnexpectedContinuation);
            }

            if !frame.fin.is_final() {
                self.pending.push(frame);
                return Ok(None);
            }

            // concatenate in arrival order, keep the opening opcode
            let opcode = self.pending[0].opcode;
            let total = self.pending.iter().map(|f| f.payload.len()).sum::<usize>()
                + frame.payload.len();
            let mut payload = Vec::with_capacity(total);
            for fragment in self.pending.drain(..) {
                payload.extend_from_slice(&fragment.payload);
            }
            payload.extend_from_slice(&frame.payload);
            return Ok(Some((opcode, payload)));
        }

        if !self.pending.is_empty() {
            return Err(FrameError::InterleavedFragments);
        }

        if frame.fin.is_final() {
            return Ok(Some((frame.opcode, frame.payload)));
        }

        self.pending.push(frame);
        Ok(None)
    }
}
