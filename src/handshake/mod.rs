//! Websocket handshake.
//!
//! Negotiation inspects the upgrade request's header set, picks one of the
//! three protocol variants from the key headers it finds, computes that
//! variant's challenge response and builds the `101` reply:
//!
//! - `Sec-WebSocket-Key` marks a hybi client,
//! - `Sec-WebSocket-Key1` + `Sec-WebSocket-Key2` mark hixie-76,
//! - no key headers at all mark hixie-75.

pub mod key;
pub mod request;
pub mod response;

pub use key::{derive_accept_key, derive_challenge76, extract_key_number};
pub use request::UpgradeRequest;
pub use response::Response;

use crate::error::HandshakeError;
use crate::version::ProtocolVersion;

/// 258EAFA5-E914-47DA-95CA-C5AB0DC85B11
pub const GUID: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Subprotocol echoed in a hixie-76 reply when the client named none.
pub const DEFAULT_PROTOCOL: &str = "default";

/// HTTP/1.1 101 Web Socket Protocol Handshake
pub const STATUS_LINE_LEGACY: &[u8] = b"HTTP/1.1 101 Web Socket Protocol Handshake";

/// HTTP/1.1 101 Switching Protocols
pub const STATUS_LINE_HYBI: &[u8] = b"HTTP/1.1 101 Switching Protocols";

/// 32
pub const MAX_ALLOW_HEADERS: usize = 32;

/// Select the protocol variant from the request's key headers.
///
/// `Sec-WebSocket-Key` wins outright. Both legacy keys select hixie-76;
/// the first without the second is a malformed request. A request with no
/// key headers is a hixie-75 client.
pub fn negotiate(request: &UpgradeRequest) -> Result<ProtocolVersion, HandshakeError> {
    if request.sec_key.is_some() {
        return Ok(ProtocolVersion::Hybi);
    }

    if request.sec_key1.is_some() {
        if request.sec_key2.is_none() {
            return Err(HandshakeError::SecWebSocketKey2);
        }
        return Ok(ProtocolVersion::Legacy76);
    }

    Ok(ProtocolVersion::Legacy75)
}
