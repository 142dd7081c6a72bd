//! Async session.
//!
//! The same pump as the blocking [`Session`](super::Session), driven over
//! a tokio IO source. `receive().await` is the only suspension point; a
//! waiting session parks its task instead of a thread.

use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::state::{SessionState, READ_CHUNK};
use crate::error::Error;
use crate::frame::OpCode;
use crate::handshake::{negotiate, Response, UpgradeRequest};
use crate::message::Message;
use crate::version::ProtocolVersion;

/// One upgraded connection on a tokio runtime.
pub struct AsyncSession<T> {
    io: T,
    state: SessionState,
    path: String,
    origin: Option<String>,
    protocol: Option<String>,
}

impl<T: AsyncRead + AsyncWrite + Unpin> AsyncSession<T> {
    /// Async version of [`Session::upgrade`](super::Session::upgrade).
    pub async fn upgrade(mut io: T, request: &UpgradeRequest) -> Result<Self, Error> {
        let version = negotiate(request)?;

        let (tail76, leftover) = match version {
            ProtocolVersion::Legacy76 => {
                let (tail, rest) = read_challenge_tail(&mut io, &request.tail).await?;
                (Some(tail), rest)
            }
            _ => (None, request.tail.clone()),
        };

        let response = Response::build(request, version, tail76.as_ref())?;
        io.write_all(&response.encode()).await?;
        debug!("negotiated {:?} for {}", version, request.path);

        let mut session = AsyncSession {
            io,
            state: SessionState::new(version),
            path: request.path.clone(),
            origin: request.origin.clone(),
            protocol: request.protocol.clone(),
        };
        session.state.feed(&leftover)?;
        Ok(session)
    }

    /// Async version of [`Session::receive`](super::Session::receive).
    pub async fn receive(&mut self) -> Result<Option<Message>, Error> {
        loop {
            if let Some(msg) = self.state.next_message() {
                return Ok(Some(msg));
            }
            if self.state.is_closed() {
                return Ok(None);
            }

            let mut chunk = [0_u8; READ_CHUNK];
            let n = match self.io.read(&mut chunk).await {
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
    pub async fn send(&mut self, text: &str) -> Result<(), Error> {
        self.send_with(OpCode::Text, text.as_bytes()).await
    }

    /// Send a message with an explicit opcode, as one atomic write.
    pub async fn send_with(&mut self, opcode: OpCode, payload: &[u8]) -> Result<(), Error> {
        let wire = self.state.encode(opcode, payload);
        self.io.write_all(&wire).await?;
        Ok(())
    }

    /// Async version of [`Session::close`](super::Session::close).
    pub async fn close(&mut self) -> Result<(), Error> {
        if !self.state.is_closed() {
            if let Some(bytes) = self.state.closing_bytes() {
                if let Err(e) = self.io.write_all(&bytes).await {
                    debug!("closing frame dropped: {}", e);
                }
            }
            self.state.set_closed();
        }
        self.io.shutdown().await?;
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

/// Async twin of the blocking challenge-tail read.
async fn read_challenge_tail<T: AsyncRead + Unpin>(
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
        let n = io.read(&mut tail[filled..]).await?;
        if n == 0 {
            return Err(Error::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }
        filled += n;
    }
    Ok((tail, Vec::new()))
}
