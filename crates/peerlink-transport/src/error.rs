//! Error types for the transmission layer.

use peerlink_protocol::ProtocolError;

/// Errors that can occur while transmitting a message.
#[derive(Debug, thiserror::Error)]
pub enum TransmitError {
    /// The host could not produce the local peer. Happens transiently
    /// during level transitions; the send fails fast rather than guess.
    #[error("cannot transmit: local peer is unavailable")]
    NoLocalPeer,

    /// A protocol-level failure, in practice an out-of-range peer id.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
