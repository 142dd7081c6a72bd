//! Transport adapter.
//!
//! The session owns its connection through this trait instead of patching
//! a socket implementation behind the scenes; any blocking byte stream
//! qualifies. Dropping the transport releases the connection.

use std::io::{Read, Result, Write};
use std::net::{Shutdown, TcpStream};

/// Blocking byte transport consumed by a session.
pub trait Transport {
    /// Read up to `buf.len()` bytes. A return of 0 means the peer is done.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write the whole buffer.
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Stop traffic in both directions, where the stream supports it.
    fn shutdown(&mut self) -> Result<()>;
}

impl Transport for TcpStream {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> { Read::read(self, buf) }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> Result<()> { Write::write_all(self, buf) }

    #[inline]
    fn shutdown(&mut self) -> Result<()> { TcpStream::shutdown(self, Shutdown::Both) }
}
