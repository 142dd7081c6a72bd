//! Client upgrade request.
//!
//! The negotiator only needs the header set: the path, the origin, the
//! optional subprotocol, and whichever key headers the client's protocol
//! generation sends. A dispatch layer that has already parsed the request
//! fills the fields directly; [`UpgradeRequest::decode`] parses them out
//! of a raw request buffer.
//!
//! Example:
//!
//! ```text
//! GET /chat HTTP/1.1
//! host: server.example.com
//! upgrade: websocket
//! connection: upgrade
//! sec-websocket-key: dGhlIHNhbXBsZSBub25jZQ==
//! origin: http://example.com
//! ```

use super::MAX_ALLOW_HEADERS;
use crate::error::HandshakeError;

/// The header set inspected during negotiation.
///
/// Absent headers are `None`. `tail` carries whatever bytes followed the
/// header block in the same read; the hixie-76 challenge body and any
/// pipelined frames start there.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UpgradeRequest {
    pub path: String,
    pub query: Option<String>,
    pub host: Option<String>,
    pub origin: Option<String>,
    pub protocol: Option<String>,
    pub sec_key: Option<String>,
    pub sec_key1: Option<String>,
    pub sec_key2: Option<String>,
    pub tail: Vec<u8>,
}

impl UpgradeRequest {
    /// An empty request for the given path; a dispatch layer fills in
    /// whatever headers it saw.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            ..Self::default()
        }
    }

    /// Parse from a raw request buffer, returning the request and the
    /// count of header bytes consumed.
    ///
    /// The method, http version, `upgrade` and `connection` headers are
    /// checked (values case-insensitive). A buffer without a complete
    /// header block is [`HandshakeError::NotEnoughData`]; the caller
    /// reads more and retries.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), HandshakeError> {
        let mut headers = [httparse::EMPTY_HEADER; MAX_ALLOW_HEADERS];
        let mut parsed = httparse::Request::new(&mut headers);

        let head_n = match parsed.parse(buf)? {
            httparse::Status::Complete(n) => n,
            httparse::Status::Partial => return Err(HandshakeError::NotEnoughData),
        };

        // method and version are always present on a complete parse
        // ref: https://docs.rs/httparse/latest/src/httparse/lib.rs.html
        if parsed.method != Some("GET") {
            return Err(HandshakeError::HttpMethod);
        }
        if parsed.version != Some(1_u8) {
            return Err(HandshakeError::HttpVersion);
        }

        let full_path = parsed.path.unwrap_or("/");
        let (path, query) = match full_path.split_once('?') {
            Some((p, q)) => (p.to_owned(), Some(q.to_owned())),
            None => (full_path.to_owned(), None),
        };

        let mut request = UpgradeRequest {
            path,
            query,
            tail: buf[head_n..].to_vec(),
            ..Self::default()
        };

        let mut upgrade_ok = false;
        let mut connection_ok = false;

        for hdr in parsed.headers.iter() {
            let value = String::from_utf8_lossy(hdr.value).into_owned();
            if hdr.name.eq_ignore_ascii_case("upgrade") {
                upgrade_ok = hdr.value.eq_ignore_ascii_case(b"websocket");
            } else if hdr.name.eq_ignore_ascii_case("connection") {
                connection_ok = hdr.value.eq_ignore_ascii_case(b"upgrade");
            } else if hdr.name.eq_ignore_ascii_case("host") {
                request.host = Some(value);
            } else if hdr.name.eq_ignore_ascii_case("origin") {
                request.origin = Some(value);
            } else if hdr.name.eq_ignore_ascii_case("sec-websocket-protocol")
                || hdr.name.eq_ignore_ascii_case("websocket-protocol")
            {
                request.protocol = Some(value);
            } else if hdr.name.eq_ignore_ascii_case("sec-websocket-key") {
                request.sec_key = Some(value);
            } else if hdr.name.eq_ignore_ascii_case("sec-websocket-key1") {
                request.sec_key1 = Some(value);
            } else if hdr.name.eq_ignore_ascii_case("sec-websocket-key2") {
                request.sec_key2 = Some(value);
            }
        }

        if !upgrade_ok {
            return Err(HandshakeError::Upgrade);
        }
        if !connection_ok {
            return Err(HandshakeError::Connection);
        }

        Ok((request, head_n))
    }

    /// Location echoed back in the legacy response headers:
    /// `ws://{host}{path}` plus the query string when one was sent.
    pub fn location(&self) -> String {
        let host = self.host.as_deref().unwrap_or("");
        match &self.query {
            Some(q) => format!("ws://{}{}?{}", host, self.path, q),
            None => format!("ws://{}{}", host, self.path),
        }
    }
}
