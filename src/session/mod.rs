//! Websocket session.
//!
//! A session owns its connection after a successful upgrade: the input
//! buffer, the pending-fragment list and the ready-message queue live
//! here, and `receive`/`send` drive the codec and reassembler until whole
//! messages move.
//!
//! ```ignore
//! {
//!     let (request, _) = UpgradeRequest::decode(&buf)?;
//!     let mut ws = Session::upgrade(tcp, &request)?;
//!
//!     while let Some(msg) = ws.receive()? {
//!         ws.send("echo")?;
//!     }
//!     ws.close()?;
//! }
//! ```

mod reassembly;
mod state;

pub use reassembly::Reassembler;

cfg_if::cfg_if! {
    if #[cfg(feature = "tokio")] {
        mod async_session;
        pub use async_session::AsyncSession;
    }
}

use log::debug;

use state::{SessionState, READ_CHUNK};

use crate::error::Error;
use crate::frame::OpCode;
use crate::handshake::{negotiate, Response, UpgradeRequest};
use crate::message::Message;
use crate::transport::Transport;
use crate::version::ProtocolVersion;

/// One upgraded connection, driven by one logical flow at a time.
///
/// `receive` is the only blocking point; `send` performs a single write
/// and does not suspend. Two flows sending on the same session must be
/// serialized by the caller.
pub struct Session<T: Transport> {
    io: T,
    state: SessionState,
    path: String,
    origin: Option<String>,
    protocol: Option<String>,
}

impl<T: Transport> Session<T> {
    /// Negotiate the upgrade and bind a session to the connection.
    ///
    /// The `101` reply is written to the transport before this returns;
    /// a failed negotiation writes nothing. Request bytes that were read
    /// beyond the hixie-76 challenge body are kept, so pipelined frames
    /// are not lost.
    pub fn upgrade(mut io: T, request: &UpgradeRequest) -> Result<Self, Error> {
        let version = negotiate(request)?;

        let (tail76, leftover) = match version {
            ProtocolVersion::Legacy76 => {
                let (tail, rest) = read_challenge_tail(&mut io, &request.tail)?;
                (Some(tail), rest)
            }
            _ => (None, request.tail.clone()),
        };

        let response = Response::build(request, version, tail76.as_ref())?;
        io.write_all(&response.encode())?;
        debug!("negotiated {:?} for {}", version, request.path);

        let mut session = Session {
            io,
            state: SessionState::new(version),
            path: request.path.clone(),
            origin: request.origin.clone(),
            protocol: request.protocol.clone(),
        };
        session.state.feed(&leftover)?;
        Ok(session)
    }

    /// Wait for the next message, the oldest not yet returned.
    ///
    /// Pulls from the transport only when no complete message is already
    /// buffered. `None` is terminal: the peer closed or disconnected.
    pub fn receive(&mut self) -> Result<Option<Message>, Error> {
        loop {
            if let Some(msg) = self.state.next_message() {
                return Ok(Some(msg));
            }
            if self.state.is_closed() {
                return Ok(None);
            }

            let mut chunk = [0_u8; READ_CHUNK];
            let n = match self.io.read(&mut chunk) {
                Ok(n) => n,
                Err(e) => {
                    // a disconnect at any read tears the session down
                    self.state.set_closed();
                    return Err(e.into());
                }
            };
            if n == 0 {
                debug!("transport eof");
                self.state.set_closed();
                return Ok(None);
            }
            if let Err(e) = self.state.feed(&chunk[..n]) {
                // protocol violations are fatal, not retried
                self.state.set_closed();
                return Err(e.into());
            }
        }
    }

    /// Send a text message.
    #[inline]
    pub fn send(&mut self, text: &str) -> Result<(), Error> {
        self.send_with(OpCode::Text, text.as_bytes())
    }

    /// Send a message with an explicit opcode, as one atomic write.
    pub fn send_with(&mut self, opcode: OpCode, payload: &[u8]) -> Result<(), Error> {
        let wire = self.state.encode(opcode, payload);
        self.io.write_all(&wire)?;
        Ok(())
    }

    /// Send the closing sequence once and shut the transport down.
    ///
    /// Closing-frame write failures are swallowed; use
    /// [`close_strict`](Self::close_strict) to surface them.
    pub fn close(&mut self) -> Result<(), Error> { self.close_inner(false) }

    /// As [`close`](Self::close), propagating closing-frame write errors.
    pub fn close_strict(&mut self) -> Result<(), Error> { self.close_inner(true) }

    fn close_inner(&mut self, strict: bool) -> Result<(), Error> {
        if !self.state.is_closed() {
            if let Some(bytes) = self.state.closing_bytes() {
                match self.io.write_all(&bytes) {
                    Ok(()) => {}
                    Err(e) if strict => return Err(e.into()),
                    Err(e) => debug!("closing frame dropped: {}", e),
                }
            }
            self.state.set_closed();
        }
        self.io.shutdown()?;
        Ok(())
    }

    /// Request path from the upgrade request.
    #[inline]
    pub fn path(&self) -> &str { &self.path }

    /// `Origin` header from the upgrade request.
    #[inline]
    pub fn origin(&self) -> Option<&str> { self.origin.as_deref() }

    /// Subprotocol named by the upgrade request.
    #[inline]
    pub fn protocol(&self) -> Option<&str> { self.protocol.as_deref() }

    /// The negotiated protocol variant.
    #[inline]
    pub const fn version(&self) -> ProtocolVersion { self.state.version() }

    /// Whether the session saw a close or a disconnect.
    #[inline]
    pub const fn is_closed(&self) -> bool { self.state.is_closed() }
}

/// Gather the 8-byte hixie-76 challenge body: whatever followed the
/// headers first, the transport for the rest. Returns the body and any
/// surplus bytes, which already belong to the frame stream.
fn read_challenge_tail<T: Transport>(
    io: &mut T,
    buffered: &[u8],
) -> Result<([u8; 8], Vec<u8>), Error> {
    let mut tail = [0_u8; 8];

    if buffered.len() >= 8 {
        tail.copy_from_slice(&buffered[..8]);
        return Ok((tail, buffered[8..].to_vec()));
    }

    tail[..buffered.len()].copy_from_slice(buffered);
    let mut filled = buffered.len();
    while filled < 8 {
        let n = io.read(&mut tail[filled..])?;
        if n == 0 {
            return Err(Error::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        filled += n;
    }
    Ok((tail, Vec::new()))
}
