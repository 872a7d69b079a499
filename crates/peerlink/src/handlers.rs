//! Bulk enable/disable of a component's message functions.
//!
//! A component that declares several [`NetworkFunction`]s implements
//! [`NetworkHandlers`] once, listing them, and then a single
//! [`register_handlers`] / [`unregister_handlers`] pair follows the
//! component's own lifecycle. This is the glue a host integration calls
//! when a plugin is loaded or unloaded.

use tracing::warn;

use peerlink_protocol::MessageShape;

use crate::function::{NetworkFunction, Route};
use crate::Netplay;

/// Object-safe view of a message function, for heterogeneous lists.
pub trait NetworkFunctionHandle {
    fn identifier(&self) -> &str;
    fn enable(&self, net: &Netplay);
    fn disable(&self, net: &Netplay);
}

impl<S: MessageShape, R: Route> NetworkFunctionHandle for NetworkFunction<S, R> {
    fn identifier(&self) -> &str {
        NetworkFunction::identifier(self)
    }

    fn enable(&self, net: &Netplay) {
        NetworkFunction::enable(self, net);
    }

    fn disable(&self, net: &Netplay) {
        NetworkFunction::disable(self, net);
    }
}

/// A component owning a set of message functions.
pub trait NetworkHandlers {
    /// The functions this component wants live while it is active.
    /// Bound template functions belong here alongside plain ones.
    fn network_functions(&self) -> Vec<&dyn NetworkFunctionHandle>;
}

/// Enables every function the component lists. Logs a warning when the
/// list is empty, since that usually means a declaration was forgotten
/// rather than intended.
pub fn register_handlers(component: &dyn NetworkHandlers, net: &Netplay) {
    let functions = component.network_functions();
    if functions.is_empty() {
        warn!("register_handlers called with no network functions");
        return;
    }
    for function in functions {
        function.enable(net);
    }
}

/// Disables every function the component lists. Messages already queued
/// or in flight are unaffected.
pub fn unregister_handlers(component: &dyn NetworkHandlers, net: &Netplay) {
    for function in component.network_functions() {
        function.disable(net);
    }
}
