//! Challenge computation.
//!
//! Each protocol variant proves the handshake differently: hybi hashes the
//! client key with a fixed GUID, hixie-76 hides two numbers in junk-filled
//! key headers and hashes them with an 8-byte request tail. hixie-75 has no
//! challenge at all.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use md5::Md5;
use sha1::{Digest, Sha1};

use super::GUID;
use crate::error::HandshakeError;

/// Derive `Sec-WebSocket-Accept` from the client's `Sec-WebSocket-Key`.
#[inline]
pub fn derive_accept_key(sec_key: &[u8]) -> [u8; 28] {
    let mut sha1 = Sha1::default();
    sha1.update(sec_key);
    sha1.update(GUID);
    let input = sha1.finalize();
    let mut output = [0_u8; 28];
    Engine::encode_slice(&STANDARD, input, &mut output).unwrap();
    output
}

/// Extract the number hidden in a hixie-76 key header.
///
/// Decimal digits are concatenated in order, then divided by the count of
/// space characters. A key without digits or without spaces is malformed,
/// as is a quotient that does not fit 32 bits.
pub fn extract_key_number(value: &str) -> Result<u32, HandshakeError> {
    let mut digits: u64 = 0;
    let mut any_digit = false;
    let mut spaces: u64 = 0;

    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits = digits
                .checked_mul(10)
                .and_then(|d| d.checked_add(ch as u64 - '0' as u64))
                .ok_or(HandshakeError::KeyOverflow)?;
            any_digit = true;
        } else if ch == ' ' {
            spaces += 1;
        }
    }

    if !any_digit {
        return Err(HandshakeError::KeyDigits);
    }
    if spaces == 0 {
        return Err(HandshakeError::KeySpaces);
    }

    u32::try_from(digits / spaces).map_err(|_| HandshakeError::KeyOverflow)
}

/// Compute the hixie-76 challenge response.
///
/// The two key numbers are packed big-endian, the 8 bytes that followed
/// the request headers are appended, and the MD5 digest of those 12 bytes
/// is the response token.
pub fn derive_challenge76(
    key1: &str,
    key2: &str,
    tail: &[u8; 8],
) -> Result<[u8; 16], HandshakeError> {
    let n1 = extract_key_number(key1)?;
    let n2 = extract_key_number(key2)?;

    let mut md5 = Md5::default();
    md5.update(n1.to_be_bytes());
    md5.update(n2.to_be_bytes());
    md5.update(tail);
    Ok(md5.finalize().into())
}
