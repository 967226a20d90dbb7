//! Controller argument resolution.
//!
//! A controller declares its parameter list as a [`Signature`]; the
//! [`ResolverChain`] fills each slot by asking an ordered list of small
//! predicate-plus-producer resolvers. The first resolver that supplies a
//! value for a slot wins (a short-circuit per slot, not globally), and
//! chain order is the only precedence rule there is: the kernel inserts a
//! request-bound resolver *ahead* of the configured chain so request-typed
//! slots always see the live request.
//!
//! [`Signature`]: reqflow_core::Signature

mod chain;
mod resolvers;

pub use chain::ResolverChain;
pub use resolvers::{
    AssociativeResolver, ContainerResolver, DefaultValueResolver, PositionalResolver,
    RequestResolver, TypedBagResolver,
};

use reqflow_core::{ArgBag, ArgValue, controller::ParamSlot};

/// One link of the resolver chain: a predicate plus a producer for a
/// single parameter slot.
pub trait ParamResolver: Send + Sync {
    /// Whether this resolver can supply a value for `slot`.
    fn can_resolve(&self, slot: &ParamSlot, provided: &ArgBag) -> bool;

    /// Supply a value for `slot`, if possible.
    fn resolve(&self, slot: &ParamSlot, provided: &ArgBag) -> Option<ArgValue>;
}
