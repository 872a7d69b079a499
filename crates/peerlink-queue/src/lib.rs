//! Throttled send queue for Peerlink.
//!
//! The host's channel imposes an undocumented bandwidth cap, and when
//! it's exceeded messages are *silently* dropped. This crate paces
//! outgoing traffic to stay under it: a single FIFO in front of the
//! transmission layer, draining a small fixed number of entries per
//! simulation tick.
//!
//! This is a throttle, not a reliability mechanism — the underlying
//! primitives are already reliable and ordered.
//!
//! The queue itself is passive. A message arriving while the drain is
//! idle is handed straight back for immediate synchronous sending;
//! everything behind it waits for the per-tick drain, which the
//! embedding context drives and which disarms itself once the FIFO
//! runs dry.

use std::collections::VecDeque;

use peerlink_protocol::PeerId;

/// How many queued messages may go out per simulation tick.
///
/// Deliberately low. One message per tick has proven enough to stay
/// under the channel's cap; senders with large payloads should split
/// them across calls rather than raise this.
pub const MAX_MESSAGES_PER_TICK: usize = 1;

/// Where a queued message is bound.
///
/// The public `Authority` destination is pinned to the authority's
/// stable id before a message reaches the queue, and self-targets never
/// get here at all — so the wire only ever sees these two cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireDestination {
    /// Every connected peer.
    Broadcast,
    /// One peer, re-resolved against the live peer list at drain time.
    Targeted(PeerId),
}

/// One outgoing message, immutable once enqueued and consumed exactly
/// once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedMessage {
    pub destination: WireDestination,
    pub identifier: String,
    pub payload: String,
}

/// Result of an [`MessageQueue::enqueue`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enqueued {
    /// The drain was idle: the message goes out immediately and
    /// synchronously, and the per-tick drain is armed for whatever
    /// gets queued behind it.
    SendNow(QueuedMessage),
    /// The message joined the FIFO and will go out on a later tick.
    Queued,
}

/// The single process-wide send FIFO.
#[derive(Debug)]
pub struct MessageQueue {
    entries: VecDeque<QueuedMessage>,
    max_per_tick: usize,
    armed: bool,
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::with_cap(MAX_MESSAGES_PER_TICK)
    }

    /// A queue with a non-default per-tick cap.
    pub fn with_cap(max_per_tick: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_per_tick: max_per_tick.max(1),
            armed: false,
        }
    }

    /// Appends a message, arming the per-tick drain.
    ///
    /// While the drain is idle the message skips the FIFO entirely and
    /// is returned for an immediate synchronous send; everything that
    /// arrives before the drain stands down again waits its tick.
    pub fn enqueue(&mut self, message: QueuedMessage) -> Enqueued {
        if !self.armed {
            self.armed = true;
            return Enqueued::SendNow(message);
        }
        self.entries.push_back(message);
        Enqueued::Queued
    }

    /// Removes up to the per-tick cap of entries, in FIFO order.
    ///
    /// Called once per simulation tick while armed. A tick that finds
    /// the FIFO empty disarms the drain; it stays disarmed until the
    /// next enqueue.
    pub fn drain_tick(&mut self) -> Vec<QueuedMessage> {
        if !self.armed {
            return Vec::new();
        }
        let mut batch = Vec::new();
        for _ in 0..self.max_per_tick {
            match self.entries.pop_front() {
                Some(message) => batch.push(message),
                None => {
                    self.armed = false;
                    break;
                }
            }
        }
        batch
    }

    /// Whether the per-tick drain is currently armed.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
