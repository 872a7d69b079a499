//! Peer identity.
//!
//! A participant is identified by a small integer id that stays stable
//! for its whole session. Object handles are *not* stable — the host
//! recreates them across level transitions — so everything in this
//! subsystem addresses peers by id and resolves a live handle at the
//! time of use.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// The range where `f32` still has integer precision.
///
/// One of the two host primitives carries the sender's id in a float
/// field, so any id outside this range would be corrupted in transit.
/// In practice ids stay low; we fail loudly if they ever don't.
pub const WIRE_SAFE_RANGE: Range<i32> = -0x100_0000..0x100_0000;

/// A session participant's stable identifier.
///
/// Newtype over `i32` so an id can't be confused with the other integer
/// fields travelling through the primitives. `#[serde(transparent)]`
/// keeps the JSON form a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(pub i32);

impl PeerId {
    /// Converts the id to its wire form, validating it survives the
    /// trip through an `f32` field.
    ///
    /// # Errors
    /// [`ProtocolError::PeerIdOutOfRange`] when the id is not exactly
    /// representable. This is fatal to the send that requested it.
    pub fn to_wire(self) -> Result<f32, ProtocolError> {
        if WIRE_SAFE_RANGE.contains(&self.0) {
            Ok(self.0 as f32)
        } else {
            Err(ProtocolError::PeerIdOutOfRange(self.0))
        }
    }

    /// Recovers an id from the wire's float field.
    pub fn from_wire(value: f32) -> Self {
        Self(value as i32)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}
