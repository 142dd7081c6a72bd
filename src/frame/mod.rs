//! Websocket data frames.
//!
//! Two wire layouts coexist here. The hybi layout
//! ([RFC-6455 Section 5](https://datatracker.ietf.org/doc/html/rfc6455#section-5)):
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |   (if payload len==126/127)   |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
//! |     Extended payload length continued, if payload len == 127  |
//! + - - - - - - - - - - - - - - - +-------------------------------+
//! |                               |Masking-key, if MASK set to 1  |
//! +-------------------------------+-------------------------------+
//! | Masking-key (continued)       |          Payload Data         |
//! +-------------------------------- - - - - - - - - - - - - - - - +
//! ```
//!
//! The legacy hixie layout frames text between sentinels:
//!
//! ```text
//! +------+- - - - - - - - -+------+
//! | 0x00 |  UTF-8 payload  | 0xFF |
//! +------+- - - - - - - - -+------+
//! ```
//!
//! with `0xFF 0x00` as the closing handshake.

pub mod flag;
pub mod legacy;
pub mod length;
pub mod mask;

mod hybi;

pub use flag::{Fin, OpCode};
pub use length::PayloadLen;
pub use mask::Mask;

use crate::error::FrameError;
use crate::version::ProtocolVersion;

/// One decoded frame.
///
/// Ephemeral: produced by [`Codec::decode`], handed straight to the
/// reassembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub fin: Fin,
    pub rsv1: bool,
    pub rsv2: bool,
    pub rsv3: bool,
    pub opcode: OpCode,
    pub payload: Vec<u8>,
    /// Bytes this frame occupies in the source buffer, head and
    /// mask key included.
    pub consumed: usize,
}

impl Frame {
    /// Assemble a frame record with clear reserved bits.
    #[inline]
    pub fn new(fin: Fin, opcode: OpCode, payload: Vec<u8>, consumed: usize) -> Self {
        Frame {
            fin,
            rsv1: false,
            rsv2: false,
            rsv3: false,
            opcode,
            payload,
            consumed,
        }
    }
}

/// Per-version frame codec.
///
/// The protocol version is fixed at handshake time; encode and decode
/// dispatch on the stored tag and never re-derive it.
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    version: ProtocolVersion,
}

impl Codec {
    /// Bind a codec to a negotiated version.
    #[inline]
    pub const fn new(version: ProtocolVersion) -> Self { Self { version } }

    #[inline]
    pub const fn version(&self) -> ProtocolVersion { self.version }

    /// Encode one outgoing message into its wire representation.
    ///
    /// The legacy variants only have text framing; the opcode is
    /// meaningful for hybi alone.
    pub fn encode(&self, opcode: OpCode, payload: &[u8]) -> Vec<u8> {
        match self.version {
            ProtocolVersion::Hybi => hybi::encode(opcode, payload),
            _ => legacy::encode(payload),
        }
    }

    /// Decode one frame from the front of `buf`.
    ///
    /// Returns `Ok(None)` while the buffer holds less than one complete
    /// frame. The buffer itself is never touched; the caller advances it
    /// by [`Frame::consumed`] after a successful decode, so re-invoking
    /// on a still-incomplete buffer is side-effect free.
    pub fn decode(&self, buf: &[u8]) -> Result<Option<Frame>, FrameError> {
        match self.version {
            ProtocolVersion::Hybi => hybi::decode(buf),
            _ => legacy::decode(buf),
        }
    }
}
