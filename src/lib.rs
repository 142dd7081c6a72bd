//! Server-side websocket upgrade and framing.
//!
//! Takes over a connection once the dispatch layer in front has decided to
//! upgrade it: negotiates one of three historical protocol variants from
//! the request headers, answers the variant's challenge, then pumps framed
//! messages in both directions until either side closes.
//!
//! ## Features
//! - Handshake for hixie-75, hixie-76 and hybi clients.
//! - Incremental frame decoding: partial reads are buffered, never lost.
//! - Fragmented messages reassembled in order.
//! - Blocking and tokio frontends over one protocol core.
//!
//! ## High-level API
//!
//! - [`session`]
//!
//! ```ignore
//! {
//!     // negotiate and bind
//!     let (request, _) = UpgradeRequest::decode(&buf)?;
//!     let mut ws = Session::upgrade(tcp, &request)?;
//!
//!     // pump messages
//!     while let Some(msg) = ws.receive()? {
//!         ws.send("echo")?;
//!     }
//!     ws.close()?;
//! }
//! ```
//!
//! ## Low-level API
//!
//! - [`frame`]
//! - [`handshake`]
//!
//! Frame:
//!
//! ```ignore
//! {
//!     // encode a frame
//!     let codec = Codec::new(ProtocolVersion::Hybi);
//!     let wire = codec.encode(OpCode::Text, b"hey");
//!
//!     // decode one frame from a buffer; None means read more
//!     let frame = codec.decode(&buf)?;
//! }
//! ```
//!
//! Handshake:
//!
//! ```ignore
//! {
//!     // parse an upgrade request
//!     let (request, _) = UpgradeRequest::decode(&buf)?;
//!
//!     // pick the variant and build the 101 reply
//!     let version = negotiate(&request)?;
//!     let reply = Response::build(&request, version, None)?.encode();
//! }
//! ```

pub mod error;
pub mod frame;
pub mod handshake;
pub mod message;
pub mod session;
pub mod transport;
pub mod version;
