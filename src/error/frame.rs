use std::fmt::{Display, Formatter};

/// Frame-level protocol violations. Fatal to the session.
///
/// An incomplete frame is not an error: decode reports it as `Ok(None)`
/// so the caller can read more bytes and retry.
#[derive(Debug, PartialEq, Eq)]
pub enum FrameError {
    UnknownOpCode(u8),

    UnknownFrameType(u8),

    BadCloseHandshake(u8),

    UnexpectedContinuation,

    InterleavedFragments,

    InvalidUtf8,

    PayloadTooLarge,
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use FrameError::*;
        match self {
            UnknownOpCode(b) => write!(f, "Unknown opcode value {:#04x}", b),
            UnknownFrameType(b) => write!(f, "Unknown leading frame byte {:#04x}", b),
            BadCloseHandshake(b) => {
                write!(f, "Unexpected closing handshake byte {:#04x}", b)
            }
            UnexpectedContinuation => {
                write!(f, "Continuation frame without an open fragmented message")
            }
            InterleavedFragments => {
                write!(f, "New frame interleaved with an open fragmented message")
            }
            InvalidUtf8 => write!(f, "Invalid utf-8 in text message"),
            PayloadTooLarge => write!(f, "Declared payload length exceeds address space"),
        }
    }
}

// use default impl
impl std::error::Error for FrameError {}
