//! Message dispatch registry for Peerlink.
//!
//! A single process-wide mapping from message identifier to callback.
//! The transmission layer hands every received payload here; the
//! registry finds the handler, runs it with the recovered sender, and
//! contains anything that goes wrong — a misbehaving handler must never
//! break dispatch of unrelated messages arriving in the same batch.
//!
//! Unroutable messages get best-effort diagnostics: one warning per
//! unknown identifier, re-armed whenever a handler is registered for it
//! again, so a disable → enable → disable cycle still surfaces fresh
//! mismatches without spamming the log every receipt.
//!
//! Everything here runs on the single simulation thread (interior
//! mutability via `RefCell`, not locks). Handlers may re-enter the
//! registry — registering, unregistering, or sending from inside a
//! callback is fine; only a synchronous self-dispatch of the *same*
//! identifier is rejected.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use peerlink_protocol::{PeerId, ProtocolError};
use tracing::{debug, error, warn};

/// Error produced by a dispatch callback.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The received payload could not be decoded into the handler's
    /// argument shape.
    #[error(transparent)]
    Decode(#[from] ProtocolError),

    /// The handler itself failed.
    #[error("handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error>),
}

/// A registered callback: receives the sender's id and the raw wire
/// payload (still encoded — decoding is the callback's job, since only
/// it knows the message's shape).
pub type NetworkCallback = Box<dyn FnMut(PeerId, &str) -> Result<(), DispatchError>>;

/// What became of one dispatched message. Logged internally; returned
/// so the receive path (and tests) can observe delivery without
/// scraping logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran to completion.
    Delivered,
    /// No handler is registered for the identifier; the message was
    /// dropped. `first_warning` is true if this receipt produced the
    /// one-shot warning.
    NoHandler { first_warning: bool },
    /// A handler was found but the message was not delivered cleanly —
    /// decode failure, handler error, or re-entrant self-dispatch. The
    /// cause has been logged; the registry is untouched.
    Failed,
}

/// The process-wide identifier → callback mapping.
///
/// There is exactly one of these per running process, shared by every
/// registered handler; it is owned by the `Netplay` context handle.
#[derive(Default)]
pub struct DispatchRegistry {
    // Callbacks are individually reference-counted so dispatch can run
    // one without holding the map borrow — handlers re-enter the
    // registry when they enable other functions or send messages.
    callbacks: RefCell<HashMap<String, Rc<RefCell<NetworkCallback>>>>,
    warned_unknown: RefCell<HashSet<String>>,
}

impl DispatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback to run when a message with the given
    /// identifier is received. Replaces any previous callback for the
    /// same identifier.
    pub fn register(&self, identifier: impl Into<String>, callback: NetworkCallback) {
        let identifier = identifier.into();
        // Re-arm the unknown-identifier warning: going disabled →
        // enabled → disabled should surface a fresh mismatch.
        self.warned_unknown.borrow_mut().remove(&identifier);
        self.callbacks
            .borrow_mut()
            .insert(identifier, Rc::new(RefCell::new(callback)));
    }

    /// Removes a previously registered callback. Removing an identifier
    /// that was never registered is a no-op.
    pub fn unregister(&self, identifier: &str) {
        if self.callbacks.borrow_mut().remove(identifier).is_none() {
            debug!(identifier, "unregister of an identifier that was not registered");
        }
    }

    /// Whether a callback is currently registered for the identifier.
    pub fn is_registered(&self, identifier: &str) -> bool {
        self.callbacks.borrow().contains_key(identifier)
    }

    /// Delivers a received message to its handler.
    ///
    /// Never panics and never propagates handler errors — every failure
    /// is logged here, at the point closest to where it occurred, so
    /// nothing leaks back into the host's own call dispatch.
    pub fn dispatch(&self, sender: PeerId, identifier: &str, wire: &str) -> DispatchOutcome {
        let callback = self.callbacks.borrow().get(identifier).cloned();

        let Some(callback) = callback else {
            let first = self
                .warned_unknown
                .borrow_mut()
                .insert(identifier.to_owned());
            if first {
                warn!(
                    identifier,
                    "received a network message with an unknown identifier"
                );
                warn!("are all peers running the same set of extensions?");
            }
            return DispatchOutcome::NoHandler {
                first_warning: first,
            };
        };

        match callback.try_borrow_mut() {
            Ok(mut run) => match run(sender, wire) {
                Ok(()) => DispatchOutcome::Delivered,
                Err(e) => {
                    error!(identifier, %sender, error = %e, "network handler failed");
                    DispatchOutcome::Failed
                }
            },
            Err(_) => {
                // The handler for this identifier is already on the call
                // stack (it synchronously sent a message to itself).
                error!(
                    identifier,
                    %sender,
                    "re-entrant dispatch of the same identifier, message dropped"
                );
                DispatchOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn counting_callback(count: Rc<Cell<u32>>) -> NetworkCallback {
        Box::new(move |_sender, _wire| {
            count.set(count.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn test_register_and_dispatch() {
        let registry = DispatchRegistry::new();
        let count = Rc::new(Cell::new(0));
        registry.register("a:b", counting_callback(Rc::clone(&count)));

        let outcome = registry.dispatch(PeerId(1), "a:b", "payload");
        assert_eq!(outcome, DispatchOutcome::Delivered);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_callback_sees_sender_and_wire() {
        let registry = DispatchRegistry::new();
        let seen: Rc<RefCell<Vec<(PeerId, String)>>> = Rc::default();
        let seen_inner = Rc::clone(&seen);
        registry.register(
            "a:b",
            Box::new(move |sender, wire| {
                seen_inner.borrow_mut().push((sender, wire.to_owned()));
                Ok(())
            }),
        );

        registry.dispatch(PeerId(7), "a:b", "hello");
        assert_eq!(&*seen.borrow(), &[(PeerId(7), "hello".to_owned())]);
    }

    #[test]
    fn test_unregister_stops_delivery() {
        let registry = DispatchRegistry::new();
        let count = Rc::new(Cell::new(0));
        registry.register("a:b", counting_callback(Rc::clone(&count)));
        registry.unregister("a:b");

        let outcome = registry.dispatch(PeerId(1), "a:b", "");
        assert!(matches!(outcome, DispatchOutcome::NoHandler { .. }));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_unknown_identifier_warns_exactly_once() {
        let registry = DispatchRegistry::new();

        let first = registry.dispatch(PeerId(1), "mystery", "");
        assert_eq!(
            first,
            DispatchOutcome::NoHandler {
                first_warning: true
            }
        );

        // Repeated receipts stay quiet.
        for _ in 0..4 {
            assert_eq!(
                registry.dispatch(PeerId(1), "mystery", ""),
                DispatchOutcome::NoHandler {
                    first_warning: false
                }
            );
        }
    }

    #[test]
    fn test_register_rearms_unknown_warning() {
        let registry = DispatchRegistry::new();
        registry.dispatch(PeerId(1), "mystery", "");

        // enable → disable cycle
        registry.register("mystery", Box::new(|_, _| Ok(())));
        registry.unregister("mystery");

        // The next receipt warns again.
        assert_eq!(
            registry.dispatch(PeerId(1), "mystery", ""),
            DispatchOutcome::NoHandler {
                first_warning: true
            }
        );
    }

    #[test]
    fn test_handler_error_is_contained() {
        let registry = DispatchRegistry::new();
        registry.register(
            "bad",
            Box::new(|_, _| {
                Err(DispatchError::Handler("boom".to_owned().into()))
            }),
        );
        let count = Rc::new(Cell::new(0));
        registry.register("good", counting_callback(Rc::clone(&count)));

        assert_eq!(
            registry.dispatch(PeerId(1), "bad", ""),
            DispatchOutcome::Failed
        );
        // The failing handler stays registered and unrelated dispatch
        // still works.
        assert!(registry.is_registered("bad"));
        assert_eq!(
            registry.dispatch(PeerId(1), "good", ""),
            DispatchOutcome::Delivered
        );
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_reentrant_register_from_handler() {
        // A handler enabling another function mid-dispatch must not
        // deadlock or panic.
        let registry = Rc::new(DispatchRegistry::new());
        let registry_inner = Rc::clone(&registry);
        registry.register(
            "outer",
            Box::new(move |_, _| {
                registry_inner.register("inner", Box::new(|_, _| Ok(())));
                Ok(())
            }),
        );

        assert_eq!(
            registry.dispatch(PeerId(1), "outer", ""),
            DispatchOutcome::Delivered
        );
        assert!(registry.is_registered("inner"));
    }

    #[test]
    fn test_reentrant_same_identifier_is_dropped_not_panicking() {
        let registry = Rc::new(DispatchRegistry::new());
        let registry_inner = Rc::clone(&registry);
        let depth = Rc::new(Cell::new(0u32));
        let depth_inner = Rc::clone(&depth);
        registry.register(
            "loop",
            Box::new(move |sender, wire| {
                depth_inner.set(depth_inner.get() + 1);
                // Synchronous self-send: must be rejected, not recurse.
                let nested = registry_inner.dispatch(sender, "loop", wire);
                assert_eq!(nested, DispatchOutcome::Failed);
                Ok(())
            }),
        );

        assert_eq!(
            registry.dispatch(PeerId(1), "loop", ""),
            DispatchOutcome::Delivered
        );
        assert_eq!(depth.get(), 1);
    }
}
