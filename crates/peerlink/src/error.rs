//! Unified error type for sending through Peerlink.

use peerlink_protocol::ProtocolError;
use peerlink_transport::TransmitError;

/// What can go wrong on the sending side of a message function call.
///
/// Everything a *sender* can hit is here and surfaces synchronously
/// from the call — receive-side failures (malformed payloads, missing
/// handlers, failing handlers) are logged and contained instead, since
/// there is nobody left to return them to.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The arguments could not be encoded, or a peer id is outside the
    /// float-safe wire range.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The transmission layer could not put the message on the wire.
    #[error(transparent)]
    Transmit(#[from] TransmitError),

    /// The session authority could not be found. Only possible while
    /// the peer list is empty, i.e. outside any session.
    #[error("cannot transmit: session authority is unavailable")]
    NoAuthority,
}
