//! Upgrade response.
//!
//! Each protocol generation expects a different `101` block:
//!
//! ```text
//! HTTP/1.1 101 Web Socket Protocol Handshake      (hixie-75 / hixie-76)
//! Upgrade: WebSocket
//! Connection: Upgrade
//! WebSocket-Origin: ...          | Sec-WebSocket-Origin: ...
//! WebSocket-Location: ...        | Sec-WebSocket-Protocol: ...
//!                                | Sec-WebSocket-Location: ...
//!                                | <16-byte MD5 token as body>
//!
//! HTTP/1.1 101 Switching Protocols                (hybi)
//! Upgrade: WebSocket
//! Connection: Upgrade
//! Sec-WebSocket-Accept: ...
//! ```

use super::key::{derive_accept_key, derive_challenge76};
use super::request::UpgradeRequest;
use super::{DEFAULT_PROTOCOL, STATUS_LINE_HYBI, STATUS_LINE_LEGACY};
use crate::error::HandshakeError;
use crate::version::ProtocolVersion;

/// Version-specific proof carried in the reply.
#[derive(Debug)]
enum Token {
    /// hixie-75 proves nothing.
    None,
    /// hixie-76: 16 raw MD5 bytes sent as the response body.
    Challenge([u8; 16]),
    /// hybi: base64 SHA-1 sent in `Sec-WebSocket-Accept`.
    Accept([u8; 28]),
}

/// The `101` reply written before the session takes over the connection.
#[derive(Debug)]
pub struct Response {
    version: ProtocolVersion,
    origin: String,
    location: String,
    protocol: String,
    token: Token,
}

impl Response {
    /// Build the reply for an already-negotiated version.
    ///
    /// For hixie-76 the caller supplies the 8 bytes that followed the
    /// request headers; the challenge cannot be computed without them.
    pub fn build(
        request: &UpgradeRequest,
        version: ProtocolVersion,
        tail76: Option<&[u8; 8]>,
    ) -> Result<Self, HandshakeError> {
        let token = match version {
            ProtocolVersion::Legacy75 => Token::None,
            ProtocolVersion::Legacy76 => {
                let key1 = request.sec_key1.as_deref().unwrap_or("");
                let key2 = request
                    .sec_key2
                    .as_deref()
                    .ok_or(HandshakeError::SecWebSocketKey2)?;
                let tail = tail76.ok_or(HandshakeError::ChallengeBody)?;
                Token::Challenge(derive_challenge76(key1, key2, tail)?)
            }
            ProtocolVersion::Hybi => {
                let key = request.sec_key.as_deref().unwrap_or("");
                Token::Accept(derive_accept_key(key.as_bytes()))
            }
        };

        Ok(Response {
            version,
            origin: request.origin.clone().unwrap_or_default(),
            location: request.location(),
            protocol: request
                .protocol
                .clone()
                .unwrap_or_else(|| DEFAULT_PROTOCOL.to_owned()),
            token,
        })
    }

    /// Render the full reply, body included.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(256);

        match self.version {
            ProtocolVersion::Legacy75 => {
                out.extend_from_slice(STATUS_LINE_LEGACY);
                out.extend_from_slice(b"\r\n");
                out.extend_from_slice(b"Upgrade: WebSocket\r\n");
                out.extend_from_slice(b"Connection: Upgrade\r\n");
                write_header(&mut out, "WebSocket-Origin", self.origin.as_bytes());
                write_header(&mut out, "WebSocket-Location", self.location.as_bytes());
                out.extend_from_slice(b"\r\n");
            }
            ProtocolVersion::Legacy76 => {
                out.extend_from_slice(STATUS_LINE_LEGACY);
                out.extend_from_slice(b"\r\n");
                out.extend_from_slice(b"Upgrade: WebSocket\r\n");
                out.extend_from_slice(b"Connection: Upgrade\r\n");
                write_header(&mut out, "Sec-WebSocket-Origin", self.origin.as_bytes());
                write_header(&mut out, "Sec-WebSocket-Protocol", self.protocol.as_bytes());
                write_header(&mut out, "Sec-WebSocket-Location", self.location.as_bytes());
                out.extend_from_slice(b"\r\n");
                if let Token::Challenge(token) = &self.token {
                    out.extend_from_slice(token);
                }
            }
            ProtocolVersion::Hybi => {
                out.extend_from_slice(STATUS_LINE_HYBI);
                out.extend_from_slice(b"\r\n");
                out.extend_from_slice(b"Upgrade: WebSocket\r\n");
                out.extend_from_slice(b"Connection: Upgrade\r\n");
                if let Token::Accept(accept) = &self.token {
                    write_header(&mut out, "Sec-WebSocket-Accept", accept);
                }
                out.extend_from_slice(b"\r\n");
            }
        }

        out
    }
}

fn write_header(out: &mut Vec<u8>, name: &str, value: &[u8]) {
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(b": ");
    out.extend_from_slice(value);
    out.extend_from_slice(b"\r\n");
}
