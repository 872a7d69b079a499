//! The delivery state machine: sending, authority-side forwarding, and
//! the receive hooks for both primitives.

use std::rc::Rc;

use peerlink_dispatch::DispatchRegistry;
use peerlink_protocol::{parse_tag, PeerId, TagKind};
use tracing::{debug, error, warn};

use crate::{HostRuntime, Peer, TransmitError};

/// What a receive hook tells the host to do with the intercepted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    /// Not ours — let the host's default handling run.
    Pass,
    /// This protocol has consumed the call; the primitive's default
    /// (host-visible) handling must be suppressed.
    Claim,
}

/// The transmission layer.
///
/// Owns no message state of its own: it turns already-encoded messages
/// into primitive invocations on the way out, and primitive invocations
/// into dispatches on the way in. The embedding context wires
/// [`Transmission::on_peer_call`] and [`Transmission::on_authority_call`]
/// to the host's own hook points for the two primitives.
pub struct Transmission {
    host: Rc<dyn HostRuntime>,
    registry: Rc<DispatchRegistry>,
}

impl Transmission {
    pub fn new(host: Rc<dyn HostRuntime>, registry: Rc<DispatchRegistry>) -> Self {
        Self { host, registry }
    }

    fn checked_local(&self) -> Result<Peer, TransmitError> {
        self.host.local_peer().ok_or(TransmitError::NoLocalPeer)
    }

    // -----------------------------------------------------------------------
    // Sending
    // -----------------------------------------------------------------------

    /// Puts a broadcast on the wire.
    ///
    /// The authority invokes Primitive B once per connected peer,
    /// skipping nobody; a regular participant asks the authority to do
    /// that with a single Primitive A call. Local delivery has already
    /// happened synchronously at the original send call, which is why
    /// [`Transmission::on_peer_call`] drops the authority's own echo.
    ///
    /// # Errors
    /// [`TransmitError::NoLocalPeer`] or an out-of-range sender id;
    /// nothing has been put on the wire when this errors.
    pub fn broadcast(&self, identifier: &str, payload: &str) -> Result<(), TransmitError> {
        let local = self.checked_local()?;
        let sender_wire = local.id.to_wire()?;
        let tag = TagKind::Broadcast.compose(identifier);

        if self.host.is_authority() {
            for peer in self.host.peers() {
                self.host.call_peer(peer, payload, &tag, sender_wire);
            }
        } else {
            // int_field is unused for broadcasts; our identity rides on
            // the primitive itself.
            self.host.call_authority(&tag, 0, payload);
        }
        Ok(())
    }

    /// Puts a targeted message on the wire.
    ///
    /// The target must not be the local peer — self-targets are
    /// dispatched synchronously upstream and never reach this layer.
    /// The target id is resolved against the live peer list here, at
    /// actual send time; if the peer has left in the meantime the
    /// message is silently dropped, the same as any other send racing a
    /// disconnect.
    pub fn transmit(
        &self,
        target: PeerId,
        identifier: &str,
        payload: &str,
    ) -> Result<(), TransmitError> {
        let local = self.checked_local()?;
        let Some(peer) = self.find_peer(target) else {
            debug!(%target, identifier, "target peer has left, dropping message");
            return Ok(());
        };
        let tag = TagKind::Targeted.compose(identifier);

        if self.host.is_authority() {
            self.host
                .call_peer(peer, payload, &tag, local.id.to_wire()?);
        } else {
            self.host.call_authority(&tag, target.0, payload);
        }
        Ok(())
    }

    fn find_peer(&self, id: PeerId) -> Option<Peer> {
        self.host.peers().into_iter().find(|peer| peer.id == id)
    }

    // -----------------------------------------------------------------------
    // Receiving
    // -----------------------------------------------------------------------

    /// Hook for Primitive B firing on this process.
    ///
    /// `addressed_to_local` is false when the primitive fires for a
    /// call this process issued about some *other* participant's proxy
    /// — those fire harmlessly on the calling side and are not for us.
    pub fn on_peer_call(
        &self,
        addressed_to_local: bool,
        text: &str,
        tag: &str,
        numeric_field: f32,
    ) -> HookAction {
        if !addressed_to_local {
            return HookAction::Pass;
        }
        let Some((_, identifier)) = parse_tag(tag) else {
            return HookAction::Pass;
        };
        // From here on the call is ours, whatever happens to it.

        let sender_id = PeerId::from_wire(numeric_field);
        let Some(sender) = self.find_peer(sender_id) else {
            warn!(%sender_id, tag, "network message from an unknown sender, dropping");
            return HookAction::Claim;
        };

        if self.host.local_peer().map(|peer| peer.id) == Some(sender.id) {
            // The echo of our own broadcast loop — the authority invokes
            // Primitive B on every peer including itself, but local
            // delivery already happened at the send call.
            return HookAction::Claim;
        }

        self.registry.dispatch(sender.id, identifier, text);
        HookAction::Claim
    }

    /// Hook for Primitive A firing on this process.
    ///
    /// On a regular participant this fires for the participant's own
    /// outgoing call and must pass, or the call would never reach the
    /// authority. On the authority it performs the forwarding leg:
    /// re-invoking Primitive B towards the real recipients, carrying
    /// the original sender's id in the float field.
    pub fn on_authority_call(
        &self,
        sender: PeerId,
        tag: &str,
        int_field: i32,
        text: &str,
    ) -> HookAction {
        let Some((kind, _)) = parse_tag(tag) else {
            return HookAction::Pass;
        };
        if !self.host.is_authority() {
            return HookAction::Pass;
        }

        // Nothing in the receive path may propagate back into the
        // host's own call dispatch.
        if let Err(e) = self.forward(sender, kind, tag, int_field, text) {
            error!(%sender, tag, error = %e, "failed to forward network message");
        }
        HookAction::Claim
    }

    fn forward(
        &self,
        sender: PeerId,
        kind: TagKind,
        tag: &str,
        int_field: i32,
        text: &str,
    ) -> Result<(), TransmitError> {
        let sender_wire = sender.to_wire()?;

        match kind {
            TagKind::Broadcast => {
                // Rebroadcast to everyone but the original sender, who
                // already delivered to itself.
                for peer in self.host.peers() {
                    if peer.id == sender {
                        continue;
                    }
                    self.host.call_peer(peer, text, tag, sender_wire);
                }
            }
            TagKind::Targeted => {
                let target = PeerId(int_field);
                match self.find_peer(target) {
                    Some(peer) => {
                        self.host.call_peer(peer, text, tag, sender_wire);
                    }
                    None => {
                        // The recipient presumably disconnected while
                        // the message was in flight.
                        warn!(
                            %target,
                            tag,
                            "targeted network message for a peer that does not exist, dropping"
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
