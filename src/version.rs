//! Protocol version tag.

/// Negotiated websocket protocol variant.
///
/// Decided once from the upgrade request's key headers, then fixed for the
/// lifetime of the session. Codec and session operations match on this tag
/// instead of re-deriving it from the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    /// hixie-75: header-only handshake, sentinel text framing.
    Legacy75,

    /// hixie-76: dual-key MD5 challenge, sentinel text framing,
    /// `0xFF 0x00` closing handshake.
    Legacy76,

    /// hybi: binary frame heads with masking, RFC-6455 layout.
    Hybi,
}

impl ProtocolVersion {
    /// Whether this variant uses the sentinel text framing.
    #[inline]
    pub const fn is_legacy(self) -> bool {
        matches!(self, ProtocolVersion::Legacy75 | ProtocolVersion::Legacy76)
    }
}
