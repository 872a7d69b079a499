//! Wire protocol for Peerlink.
//!
//! This crate defines the "language" that connected processes speak:
//!
//! - **Identity** ([`PeerId`]) — how a participant is named on the wire,
//!   and the float-precision rules that constrain it.
//! - **Tags** ([`TagKind`], [`parse_tag`]) — the reserved prefix that
//!   separates Peerlink traffic from the host's own use of the same
//!   remote-call primitives.
//! - **Shapes** ([`MessageShape`], [`Empty`], [`Text`], [`Json`]) — the
//!   three supported payload encodings.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding
//!   or decoding.
//!
//! # Architecture
//!
//! The protocol layer sits below everything else. It doesn't know about
//! peers lists, queues, or handlers — it only knows how to turn message
//! arguments into exactly one string per message and back.
//!
//! ```text
//! Facade (typed args) → Protocol (tag + payload string) → Transmission
//! ```

mod error;
mod peer;
mod shape;
mod tags;
mod types;

pub use error::ProtocolError;
pub use peer::{PeerId, WIRE_SAFE_RANGE};
pub use shape::{Empty, Json, JsonArgs, MessageShape, Text};
pub use tags::{parse_tag, TagKind, PROTOCOL_TAG};
pub use types::Destination;
