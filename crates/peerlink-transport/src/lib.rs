//! Transmission layer for Peerlink.
//!
//! Provides the [`HostRuntime`] trait that abstracts the two remote-call
//! primitives the host exposes, and the [`Transmission`] state machine
//! that builds a general broadcast/targeted delivery protocol on top of
//! them.
//!
//! # How delivery works
//!
//! The host gives us exactly two reliable, ordered primitives:
//!
//! - **Primitive A** — participant → authority, fields
//!   `(tag, int_field, text)`. When a regular participant invokes it,
//!   it runs on the authority's copy of that participant, so the
//!   caller's identity rides along for free.
//! - **Primitive B** — authority (or self) → one specific participant,
//!   fields `(text, tag, numeric_field)`.
//!
//! Both are reliable, so no sequencing or acks are needed here. The
//! peer list is replicated to every process, but only the authority can
//! invoke Primitive B on other participants; a regular participant
//! reaches them by routing through the authority. That gives the full
//! matrix:
//!
//! ```text
//! authority → peer      Primitive B, directly
//! peer → authority      Primitive A
//! peer → peer           Primitive A, forwarded by the authority via B
//! anyone → itself       no wire at all, dispatched synchronously
//! ```
//!
//! The sender's id travels in Primitive B's float field, which is why
//! [`PeerId::to_wire`](peerlink_protocol::PeerId::to_wire) range-checks
//! it before every send.

mod error;
mod host;
mod transmission;

pub use error::TransmitError;
pub use host::{HostRuntime, Peer};
pub use transmission::{HookAction, Transmission};
