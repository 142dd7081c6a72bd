//! Session state.
//!
//! The IO-free half of a session: the input buffer, the reassembler and
//! the ready-message queue. The blocking and async frontends both drive
//! this core and differ only in how bytes move.

use std::collections::VecDeque;

use log::{debug, trace};

use super::reassembly::Reassembler;
use crate::error::FrameError;
use crate::frame::{legacy, Codec, OpCode};
use crate::message::Message;
use crate::version::ProtocolVersion;

/// Bytes requested from the transport per read.
pub(super) const READ_CHUNK: usize = 8192;

#[derive(Debug)]
pub(super) struct SessionState {
    codec: Codec,
    input: Vec<u8>,
    /// Front offset of not-yet-decoded bytes in `input`; consumed bytes
    /// are dropped in one cut per feed, not per frame.
    offset: usize,
    reassembler: Reassembler,
    ready: VecDeque<Message>,
    closed: bool,
}

impl SessionState {
    pub(super) fn new(version: ProtocolVersion) -> Self {
        Self {
            codec: Codec::new(version),
            input: Vec::new(),
            offset: 0,
            reassembler: Reassembler::new(),
            ready: VecDeque::new(),
            closed: false,
        }
    }

    #[inline]
    pub(super) const fn version(&self) -> ProtocolVersion { self.codec.version() }

    #[inline]
    pub(super) const fn is_closed(&self) -> bool { self.closed }

    /// Close is monotonic: once set it is never cleared.
    #[inline]
    pub(super) fn set_closed(&mut self) { self.closed = true; }

    /// Pop the oldest ready message.
    #[inline]
    pub(super) fn next_message(&mut self) -> Option<Message> { self.ready.pop_front() }

    /// Encode one outgoing message for this session's version.
    #[inline]
    pub(super) fn encode(&self, opcode: OpCode, payload: &[u8]) -> Vec<u8> {
        self.codec.encode(opcode, payload)
    }

    /// The closing sequence owed to the peer on teardown, if the
    /// negotiated version has one.
    pub(super) fn closing_bytes(&self) -> Option<Vec<u8>> {
        match self.version() {
            ProtocolVersion::Legacy76 => Some(legacy::CLOSING_HANDSHAKE.to_vec()),
            ProtocolVersion::Hybi => Some(self.codec.encode(OpCode::Close, &[])),
            ProtocolVersion::Legacy75 => None,
        }
    }

    /// Append freshly read bytes and decode as many frames as the buffer
    /// now holds.
    ///
    /// Complete messages land in the ready queue; a trailing partial
    /// frame stays buffered untouched for the next feed.
    pub(super) fn feed(&mut self, bytes: &[u8]) -> Result<(), FrameError> {
        self.input.extend_from_slice(bytes);

        while self.offset < self.input.len() {
            let frame = match self.codec.decode(&self.input[self.offset..])? {
                Some(frame) => frame,
                None => {
                    trace!("incomplete frame, awaiting more data");
                    break;
                }
            };
            self.offset += frame.consumed;

            if let Some((opcode, payload)) = self.reassembler.push(frame)? {
                self.complete(opcode, payload)?;
            }
        }

        // one front cut per feed keeps the frame-boundary invariant
        // without rebuilding the buffer for every frame
        if self.offset > 0 {
            self.input.drain(..self.offset);
            self.offset = 0;
        }

        Ok(())
    }

    /// Turn a completed payload into a queued message.
    fn complete(&mut self, opcode: OpCode, payload: Vec<u8>) -> Result<(), FrameError> {
        let message = match opcode {
            OpCode::Text => {
                if self.version().is_legacy() {
                    Message::Text(String::from_utf8_lossy(&payload).into_owned())
                } else {
                    match String::from_utf8(payload) {
                        Ok(text) => Message::Text(text),
                        Err(_) => return Err(FrameError::InvalidUtf8),
                    }
                }
            }
            OpCode::Binary => Message::Binary(payload),
            OpCode::Ping => Message::Ping(payload),
            OpCode::Pong => Message::Pong(payload),
            OpCode::Close => {
                debug!("close received from peer");
                self.closed = true;
                if self.version().is_legacy() {
                    // the sentinel closing handshake carries no message
                    return Ok(());
                }
                Message::Close(payload)
            }
            // the reassembler tags a completed message with the opcode
            // of its first fragment, which is never Continuation
            OpCode::Continuation => unreachable!(),
        };

        self.ready.push_back(message);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frame::mask::apply_mask;

    fn masked_text(key: [u8; 4], text: &str) -> Vec<u8> {
        let mut wire = vec![0x81, 0x80 | text.len() as u8];
        wire.extend_from_slice(&key);
        let beg = wire.len();
        wire.extend_from_slice(text.as_bytes());
        apply_mask(key, &mut wire[beg..]);
        wire
    }

    #[test]
    fn byte_by_byte_feed() {
        let mut state = SessionState::new(ProtocolVersion::Hybi);
        let wire = masked_text([0x11, 0x22, 0x33, 0x44], "hello");

        for &b in &wire[..wire.len() - 1] {
            state.feed(&[b]).unwrap();
            assert!(state.next_message().is_none());
        }

        state.feed(&wire[wire.len() - 1..]).unwrap();
        assert_eq!(
            state.next_message(),
            Some(Message::Text("hello".to_owned()))
        );
        assert!(state.input.is_empty());
    }

    #[test]
    fn several_frames_one_feed() {
        let mut state = SessionState::new(ProtocolVersion::Hybi);
        let mut wire = masked_text([1, 2, 3, 4], "one");
        wire.extend_from_slice(&masked_text([5, 6, 7, 8], "two"));

        state.feed(&wire).unwrap();
        assert_eq!(state.next_message(), Some(Message::Text("one".to_owned())));
        assert_eq!(state.next_message(), Some(Message::Text("two".to_owned())));
        assert_eq!(state.next_message(), None);
    }

    #[test]
    fn trailing_partial_survives() {
        let mut state = SessionState::new(ProtocolVersion::Hybi);
        let mut wire = masked_text([1, 2, 3, 4], "whole");
        let partial = masked_text([5, 6, 7, 8], "partial");
        wire.extend_from_slice(&partial[..4]);

        state.feed(&wire).unwrap();
        assert_eq!(
            state.next_message(),
            Some(Message::Text("whole".to_owned()))
        );
        // the partial head is still buffered, at a frame boundary
        assert_eq!(state.input, &partial[..4]);

        state.feed(&partial[4..]).unwrap();
        assert_eq!(
            state.next_message(),
            Some(Message::Text("partial".to_owned()))
        );
    }

    #[test]
    fn legacy_close_marks_session() {
        let mut state = SessionState::new(ProtocolVersion::Legacy76);

        state.feed(b"\x00last\xff\xff\x00").unwrap();
        assert_eq!(state.next_message(), Some(Message::Text("last".to_owned())));
        assert_eq!(state.next_message(), None);
        assert!(state.is_closed());
    }

    #[test]
    fn hybi_close_queues_message() {
        let mut state = SessionState::new(ProtocolVersion::Hybi);
        let wire = Codec::new(ProtocolVersion::Hybi).encode(OpCode::Close, &[]);

        state.feed(&wire).unwrap();
        assert!(state.is_closed());
        assert_eq!(state.next_message(), Some(Message::Close(Vec::new())));
    }

    #[test]
    fn invalid_text_is_fatal() {
        let mut state = SessionState::new(ProtocolVersion::Hybi);
        let wire = Codec::new(ProtocolVersion::Hybi).encode(OpCode::Text, &[0xff, 0xfe]);

        assert_eq!(state.feed(&wire), Err(FrameError::InvalidUtf8));
    }

    #[test]
    fn legacy_text_is_lossy() {
        let mut state = SessionState::new(ProtocolVersion::Legacy75);

        state.feed(b"\x00a\xfeb\xff").unwrap();
        assert_eq!(
            state.next_message(),
            Some(Message::Text("a\u{fffd}b".to_owned()))
        );
    }
}
