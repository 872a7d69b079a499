//! Message function facades.
//!
//! A [`NetworkFunction`] is the one object extension authors declare
//! per message: calling it sends, and the handler it wraps is what runs
//! on every receiving process. The type is generic over the payload
//! shape and the route, so each of the nine destination × shape
//! combinations gets a compile-checked call signature instead of a
//! runtime arity check — a targeted function simply cannot be called
//! without a target peer.
//!
//! Functions that belong to a per-instance object are declared once as
//! a [`NetworkTemplate`] and bound per instance. The template itself
//! has no `enable` — only the bound function participates in dispatch,
//! which is what keeps "accidentally enabled the unbound declaration"
//! from compiling at all.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use peerlink_dispatch::DispatchError;
use peerlink_protocol::{Destination, MessageShape, PeerId};

use crate::{Netplay, SendError};

/// Result type network handlers return. Errors are logged by the
/// dispatch registry and never propagate past it.
pub type HandlerResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// Marker for where a function's messages go. See the three
/// implementors; extension code never implements this.
pub trait Route: 'static {}

/// Deliver to every connected peer, the sender included.
pub struct ToAll;
impl Route for ToAll {}

/// Deliver to the single session authority.
pub struct ToAuthority;
impl Route for ToAuthority {}

/// Deliver to one explicit peer, chosen per call.
pub struct ToPeer;
impl Route for ToPeer {}

/// Routes whose destination is fixed at declaration time (everything
/// but [`ToPeer`]).
pub trait FixedRoute: Route {
    fn destination() -> Destination;
}

impl FixedRoute for ToAll {
    fn destination() -> Destination {
        Destination::Broadcast
    }
}

impl FixedRoute for ToAuthority {
    fn destination() -> Destination {
        Destination::Authority
    }
}

// ---------------------------------------------------------------------------
// NetworkFunction
// ---------------------------------------------------------------------------

type Handler<S> = Box<dyn FnMut(PeerId, <S as MessageShape>::Args) -> HandlerResult>;

/// A declared, bindable message function.
///
/// Built through the constructor modules ([`broadcast`], [`authority`],
/// [`targeted`](crate::targeted)), or by binding a [`NetworkTemplate`].
/// It starts inert: [`enable`](NetworkFunction::enable) makes it
/// participate in dispatch, [`disable`](NetworkFunction::disable) stops
/// that again. Enablement only gates *receipt* — calling a disabled
/// function still transmits, and disabling recalls nothing already
/// queued or in flight.
pub struct NetworkFunction<S: MessageShape, R: Route> {
    identifier: String,
    // Shared with the registry closure created by enable(); the
    // indirection is what lets a handler be enabled, disabled, and
    // re-enabled without re-declaring it.
    handler: Rc<RefCell<Handler<S>>>,
    _route: PhantomData<R>,
}

impl<S: MessageShape, R: Route> NetworkFunction<S, R> {
    fn from_handler(identifier: String, handler: Handler<S>) -> Self {
        Self {
            identifier,
            handler: Rc::new(RefCell::new(handler)),
            _route: PhantomData,
        }
    }

    /// The identifier this function's messages travel under. Must be
    /// identical on every connected process for a given logical
    /// handler.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Starts listening for this function's messages.
    pub fn enable(&self, net: &Netplay) {
        let handler = Rc::clone(&self.handler);
        net.registry().register(
            self.identifier.clone(),
            Box::new(move |sender, wire| {
                let args = S::decode(wire).map_err(DispatchError::Decode)?;
                let mut run = handler.try_borrow_mut().map_err(|_| {
                    DispatchError::Handler("handler is already running".into())
                })?;
                run(sender, args).map_err(DispatchError::Handler)
            }),
        );
    }

    /// Stops listening for this function's messages. Messages already
    /// queued or in flight are unaffected.
    pub fn disable(&self, net: &Netplay) {
        net.registry().unregister(&self.identifier);
    }
}

impl<S: MessageShape, R: FixedRoute> NetworkFunction<S, R> {
    /// Encodes the arguments and sends them to this function's fixed
    /// destination. The local handler runs too (synchronously) when the
    /// local process is a recipient.
    pub fn call(&self, net: &Netplay, args: S::Args) -> Result<(), SendError> {
        let payload = S::encode(&args)?;
        net.send(R::destination(), &self.identifier, payload)
    }
}

impl<S: MessageShape> NetworkFunction<S, ToPeer> {
    /// Encodes the arguments and sends them to one specific peer. A
    /// target that is the local peer dispatches synchronously without
    /// touching the network.
    pub fn call_on(&self, net: &Netplay, target: PeerId, args: S::Args) -> Result<(), SendError> {
        let payload = S::encode(&args)?;
        net.send(Destination::Targeted(target), &self.identifier, payload)
    }
}

// ---------------------------------------------------------------------------
// NetworkTemplate
// ---------------------------------------------------------------------------

type TemplateHandler<S, T> =
    Rc<dyn Fn(&RefCell<T>, PeerId, <S as MessageShape>::Args) -> HandlerResult>;

/// The unbound declaration of a per-instance message function.
///
/// A template is declared once, against the instance *type*; every live
/// instance then gets its own [`NetworkFunction`] via
/// [`bind`](NetworkTemplate::bind). Templates deliberately have no
/// `enable` — only bound functions can participate in dispatch.
pub struct NetworkTemplate<S: MessageShape, R: Route, T> {
    identifier: String,
    handler: TemplateHandler<S, T>,
    _route: PhantomData<R>,
}

impl<S: MessageShape, R: Route, T: 'static> NetworkTemplate<S, R, T> {
    fn from_handler(identifier: String, handler: TemplateHandler<S, T>) -> Self {
        Self {
            identifier,
            handler,
            _route: PhantomData,
        }
    }

    /// The base identifier; bound copies may extend it.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Creates the function bound to one instance.
    ///
    /// When several instances are live at the same time each must get
    /// its own `suffix`, and the suffix must be *reproducible across
    /// peers* — derived from shared data, never from ephemeral values
    /// like addresses, which won't match on the other side.
    pub fn bind(
        &self,
        instance: Rc<RefCell<T>>,
        suffix: Option<&str>,
    ) -> NetworkFunction<S, R> {
        let identifier = match suffix {
            None => self.identifier.clone(),
            Some(suffix) => format!("{}:{suffix}", self.identifier),
        };
        let handler = Rc::clone(&self.handler);
        NetworkFunction::from_handler(
            identifier,
            Box::new(move |sender, args| handler(&instance, sender, args)),
        )
    }
}

// ---------------------------------------------------------------------------
// Constructors — three destinations × three shapes
// ---------------------------------------------------------------------------

macro_rules! constructor_module {
    ($module:ident, $route:ty, $route_doc:literal) => {
        #[doc = concat!("Constructors for functions delivered ", $route_doc, ".")]
        pub mod $module {
            use std::cell::RefCell;
            use std::rc::Rc;

            use peerlink_protocol::{Empty, Json, JsonArgs, Text};

            use super::{
                HandlerResult, NetworkFunction, NetworkTemplate, PeerId,
            };

            /// A function with no payload.
            pub fn message(
                identifier: impl Into<String>,
                mut handler: impl FnMut(PeerId) -> HandlerResult + 'static,
            ) -> NetworkFunction<Empty, $route> {
                NetworkFunction::from_handler(
                    identifier.into(),
                    Box::new(move |sender, ()| handler(sender)),
                )
            }

            /// A function carrying a single plain string.
            pub fn string_message(
                identifier: impl Into<String>,
                handler: impl FnMut(PeerId, String) -> HandlerResult + 'static,
            ) -> NetworkFunction<Text, $route> {
                NetworkFunction::from_handler(identifier.into(), Box::new(handler))
            }

            /// A function carrying JSON-encodable positional and named
            /// arguments. The receiving side trusts the sender's shape.
            pub fn json_message(
                identifier: impl Into<String>,
                handler: impl FnMut(PeerId, JsonArgs) -> HandlerResult + 'static,
            ) -> NetworkFunction<Json, $route> {
                NetworkFunction::from_handler(identifier.into(), Box::new(handler))
            }

            /// Per-instance variant of [`message`].
            pub fn message_template<T: 'static>(
                identifier: impl Into<String>,
                handler: impl Fn(&RefCell<T>, PeerId) -> HandlerResult + 'static,
            ) -> NetworkTemplate<Empty, $route, T> {
                NetworkTemplate::from_handler(
                    identifier.into(),
                    Rc::new(move |instance, sender, ()| handler(instance, sender)),
                )
            }

            /// Per-instance variant of [`string_message`].
            pub fn string_message_template<T: 'static>(
                identifier: impl Into<String>,
                handler: impl Fn(&RefCell<T>, PeerId, String) -> HandlerResult + 'static,
            ) -> NetworkTemplate<Text, $route, T> {
                NetworkTemplate::from_handler(identifier.into(), Rc::new(handler))
            }

            /// Per-instance variant of [`json_message`].
            pub fn json_message_template<T: 'static>(
                identifier: impl Into<String>,
                handler: impl Fn(&RefCell<T>, PeerId, JsonArgs) -> HandlerResult + 'static,
            ) -> NetworkTemplate<Json, $route, T> {
                NetworkTemplate::from_handler(identifier.into(), Rc::new(handler))
            }
        }
    };
}

constructor_module!(broadcast, super::ToAll, "to every connected peer");
constructor_module!(authority, super::ToAuthority, "to the session authority");
constructor_module!(targeted, super::ToPeer, "to one explicit peer");

/// Derives a message identifier from the declaring module's path:
/// `network_identifier!("on_score")` in `my_mod::scores` yields
/// `"my_mod::scores:on_score"`. The result is stable across builds and
/// identical on every peer running the same code, which is exactly what
/// identifiers must be.
#[macro_export]
macro_rules! network_identifier {
    ($name:expr) => {
        concat!(module_path!(), ":", $name)
    };
}
