//! The consumed surface of the host runtime.
//!
//! Everything this subsystem needs from the surrounding host is behind
//! one trait so the transmission layer can be driven by the real host
//! in production and by an in-process fake in tests.

use peerlink_protocol::PeerId;

/// A transient handle to a connected participant.
///
/// Handles are only valid at the moment they're taken from
/// [`HostRuntime::peers`] — the host recreates the underlying objects
/// across level transitions, so nothing here holds one for longer than
/// a single send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peer {
    /// The participant's stable session id.
    pub id: PeerId,
}

/// What the host runtime provides: the two remote-call primitives, the
/// live peer list, and the local process's own identity.
///
/// Single-threaded by contract — every method is called from the one
/// simulation thread, so implementations need no synchronization.
pub trait HostRuntime {
    /// The local participant, or `None` while the host can't produce
    /// it (mid-load).
    fn local_peer(&self) -> Option<Peer>;

    /// Whether the local process is the session authority.
    fn is_authority(&self) -> bool;

    /// All currently connected participants, including the local one.
    fn peers(&self) -> Vec<Peer>;

    /// The session authority's handle.
    ///
    /// The host keeps the authority as the first entry of the peer
    /// list; override if an implementation orders differently.
    fn authority_peer(&self) -> Option<Peer> {
        self.peers().into_iter().next()
    }

    /// Primitive A: a reliable, ordered call from this participant to
    /// the authority. The caller's identity is carried by the call
    /// itself.
    fn call_authority(&self, tag: &str, int_field: i32, text: &str);

    /// Primitive B: a reliable, ordered call from the authority (or a
    /// process to itself) to one specific participant.
    fn call_peer(&self, peer: Peer, text: &str, tag: &str, numeric_field: f32);
}
