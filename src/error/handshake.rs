use std::fmt::{Display, Formatter};

/// Negotiation failures. Rejected before any session exists.
#[derive(Debug, PartialEq, Eq)]
pub enum HandshakeError {
    // http error
    HttpMethod,

    HttpVersion,

    HttpHost,

    // websocket error
    Upgrade,

    Connection,

    SecWebSocketKey2,

    KeyDigits,

    KeySpaces,

    KeyOverflow,

    ChallengeBody,

    // read
    NotEnoughData,

    Httparse(httparse::Error),
}

impl Display for HandshakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use HandshakeError::*;
        match self {
            // http error
            HttpMethod => write!(f, "Illegal http method"),

            HttpVersion => write!(f, "Illegal http version"),

            HttpHost => write!(f, "Missing http host header"),

            // websocket error
            Upgrade => write!(f, "Missing or illegal upgrade header"),

            Connection => write!(f, "Missing or illegal connection header"),

            SecWebSocketKey2 => {
                write!(f, "Sec-websocket-key1 present without sec-websocket-key2")
            }

            KeyDigits => write!(f, "Key header contains no digits"),

            KeySpaces => write!(f, "Key header contains no spaces"),

            KeyOverflow => write!(f, "Key number does not fit 32 bits"),

            ChallengeBody => write!(f, "Missing 8-byte challenge body"),

            // other error
            NotEnoughData => write!(f, "Not enough data to parse"),

            Httparse(e) => write!(f, "Http parse error: {}", e),
        }
    }
}

impl From<httparse::Error> for HandshakeError {
    fn from(e: httparse::Error) -> Self { HandshakeError::Httparse(e) }
}

impl std::error::Error for HandshakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let HandshakeError::Httparse(e) = self {
            Some(e)
        } else {
            None
        }
    }
}
