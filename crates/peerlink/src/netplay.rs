//! The `Netplay` context handle.
//!
//! One `Netplay` exists per running process. It owns the process-wide
//! dispatch registry and send queue, wires them to the transmission
//! layer, and is the single object the embedding host and the message
//! facades talk to. Passing it explicitly (rather than reaching for
//! ambient globals) keeps the single-writer story obvious: everything
//! here runs on the one simulation thread.

use std::cell::RefCell;
use std::rc::Rc;

use peerlink_dispatch::DispatchRegistry;
use peerlink_protocol::{Destination, PeerId};
use peerlink_queue::{Enqueued, MessageQueue, QueuedMessage, WireDestination};
use peerlink_transport::{HookAction, HostRuntime, Peer, Transmission, TransmitError};
use tracing::error;

use crate::SendError;

/// The process-wide messaging context.
///
/// Create exactly one per process, hand the host's tick and hook
/// notifications to [`Netplay::tick`], [`Netplay::on_peer_call`] and
/// [`Netplay::on_authority_call`], and enable message functions
/// against it.
pub struct Netplay {
    host: Rc<dyn HostRuntime>,
    registry: Rc<DispatchRegistry>,
    queue: RefCell<MessageQueue>,
    transmission: Transmission,
}

impl Netplay {
    pub fn new(host: Rc<dyn HostRuntime>) -> Self {
        let registry = Rc::new(DispatchRegistry::new());
        let transmission = Transmission::new(Rc::clone(&host), Rc::clone(&registry));
        Self {
            host,
            registry,
            queue: RefCell::new(MessageQueue::new()),
            transmission,
        }
    }

    /// The dispatch registry message functions register against.
    pub fn registry(&self) -> &DispatchRegistry {
        &self.registry
    }

    // -----------------------------------------------------------------------
    // Host passthroughs
    // -----------------------------------------------------------------------

    /// The local participant, if the host can currently produce it.
    pub fn local_peer(&self) -> Option<Peer> {
        self.host.local_peer()
    }

    /// Whether this process is the session authority.
    pub fn is_authority(&self) -> bool {
        self.host.is_authority()
    }

    /// All currently connected participants.
    pub fn peers(&self) -> Vec<Peer> {
        self.host.peers()
    }

    // -----------------------------------------------------------------------
    // Sending
    // -----------------------------------------------------------------------

    /// Sends an already-encoded payload to a destination.
    ///
    /// Peer ids are range-checked here, before anything is queued or
    /// put on the wire. Deliveries whose only recipient is this process
    /// (a self-target, or the authority destination on the authority
    /// itself) dispatch synchronously inside this call and never touch
    /// the queue; a broadcast self-dispatches the local copy the same
    /// way and queues only the remote half. Self-delivery is therefore
    /// *not* ordered relative to previously queued remote traffic —
    /// intentional, see the crate docs.
    ///
    /// # Errors
    /// [`SendError`] on encoding or id-range problems, or when the
    /// local peer / authority cannot be found. Nothing has been sent or
    /// queued when this errors.
    pub fn send(
        &self,
        destination: Destination,
        identifier: &str,
        payload: String,
    ) -> Result<(), SendError> {
        let local = self
            .host
            .local_peer()
            .ok_or(TransmitError::NoLocalPeer)?;
        // The sender's id rides in a float field on every wire path.
        local.id.to_wire()?;

        match destination {
            Destination::Targeted(target) if target == local.id => {
                self.registry.dispatch(local.id, identifier, &payload);
                Ok(())
            }
            Destination::Targeted(target) => {
                target.to_wire()?;
                self.enqueue(WireDestination::Targeted(target), identifier, payload)
            }
            Destination::Authority => {
                if self.host.is_authority() {
                    self.registry.dispatch(local.id, identifier, &payload);
                    return Ok(());
                }
                let authority = self.host.authority_peer().ok_or(SendError::NoAuthority)?;
                self.enqueue(
                    WireDestination::Targeted(authority.id),
                    identifier,
                    payload,
                )
            }
            Destination::Broadcast => {
                // Local delivery first, out-of-band from the queue.
                self.registry.dispatch(local.id, identifier, &payload);
                self.enqueue(WireDestination::Broadcast, identifier, payload)
            }
        }
    }

    fn enqueue(
        &self,
        destination: WireDestination,
        identifier: &str,
        payload: String,
    ) -> Result<(), SendError> {
        let outcome = self.queue.borrow_mut().enqueue(QueuedMessage {
            destination,
            identifier: identifier.to_owned(),
            payload,
        });
        // The queue borrow is released before transmitting: sending can
        // re-enter this context through the receive hooks.
        if let Enqueued::SendNow(message) = outcome {
            self.transmit_now(&message)?;
        }
        Ok(())
    }

    fn transmit_now(&self, message: &QueuedMessage) -> Result<(), TransmitError> {
        match message.destination {
            WireDestination::Broadcast => self
                .transmission
                .broadcast(&message.identifier, &message.payload),
            WireDestination::Targeted(target) => {
                self.transmission
                    .transmit(target, &message.identifier, &message.payload)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Host notifications
    // -----------------------------------------------------------------------

    /// Per-simulation-tick notification; drains the send queue.
    ///
    /// Drain-time failures have no caller to surface to, so they are
    /// logged and the remaining entries keep flowing.
    pub fn tick(&self) {
        let batch = self.queue.borrow_mut().drain_tick();
        for message in batch {
            if let Err(e) = self.transmit_now(&message) {
                error!(
                    identifier = message.identifier.as_str(),
                    error = %e,
                    "failed to transmit queued message"
                );
            }
        }
    }

    /// Hook entry point for Primitive B; wire to the host's receive
    /// notification for it.
    pub fn on_peer_call(
        &self,
        addressed_to_local: bool,
        text: &str,
        tag: &str,
        numeric_field: f32,
    ) -> HookAction {
        self.transmission
            .on_peer_call(addressed_to_local, text, tag, numeric_field)
    }

    /// Hook entry point for Primitive A; wire to the host's receive
    /// notification for it.
    pub fn on_authority_call(
        &self,
        sender: PeerId,
        tag: &str,
        int_field: i32,
        text: &str,
    ) -> HookAction {
        self.transmission
            .on_authority_call(sender, tag, int_field, text)
    }

    // -----------------------------------------------------------------------
    // Introspection (used by tests and diagnostics)
    // -----------------------------------------------------------------------

    /// Number of messages waiting in the send queue.
    pub fn queued_messages(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Whether the per-tick drain is currently armed.
    pub fn is_draining(&self) -> bool {
        self.queue.borrow().is_armed()
    }
}
