//! Where a message should be delivered.

use serde::{Deserialize, Serialize};

use crate::PeerId;

/// The destination of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// Every connected peer, including the sender itself.
    Broadcast,

    /// The single distinguished session authority.
    Authority,

    /// One explicit peer, addressed by its stable id. The id is resolved
    /// to a live peer handle at send time; if the peer has left by then
    /// the message is dropped.
    Targeted(PeerId),
}
