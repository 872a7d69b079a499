//! # Peerlink
//!
//! Peer-to-peer message transport for plugin hosts whose only wire
//! surface is a pair of narrow, hook-observable RPC primitives.
//!
//! Plugins declare a [`NetworkFunction`] per message through the
//! [`broadcast`], [`authority`], or [`targeted`] constructors; calling
//! it sends, and the handler it wraps runs on every receiving process.
//! The framing, sender recovery, authority relaying, and per-tick
//! throttling that make this work over the host's primitives live in
//! the lower crates and never surface in plugin code.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use peerlink::{broadcast, network_identifier, Netplay};
//!
//! # fn run(host: Rc<dyn peerlink::HostRuntime>) -> Result<(), peerlink::SendError> {
//! let net = Netplay::new(host);
//!
//! let on_greet = broadcast::string_message(
//!     network_identifier!("on_greet"),
//!     |sender, text| {
//!         println!("{sender} says {text}");
//!         Ok(())
//!     },
//! );
//! on_greet.enable(&net);
//! on_greet.call(&net, "hello".to_string())?;
//! # Ok(())
//! # }
//! ```
//!
//! The embedding host drives three entry points: [`Netplay::tick`] once
//! per frame, and the two hook forwarders
//! ([`Netplay::on_peer_call`], [`Netplay::on_authority_call`]) from its
//! RPC observation layer. Everything else is plugin-facing.

mod error;
mod function;
mod handlers;
mod netplay;

pub use error::SendError;
pub use function::{
    authority, broadcast, targeted, FixedRoute, HandlerResult, NetworkFunction,
    NetworkTemplate, Route, ToAll, ToAuthority, ToPeer,
};
pub use handlers::{
    register_handlers, unregister_handlers, NetworkFunctionHandle, NetworkHandlers,
};
pub use netplay::Netplay;

pub use peerlink_dispatch::{DispatchError, DispatchOutcome};
pub use peerlink_protocol::{
    Destination, Empty, Json, JsonArgs, MessageShape, PeerId, ProtocolError, Text,
};
pub use peerlink_transport::{HookAction, HostRuntime, Peer, TransmitError};
