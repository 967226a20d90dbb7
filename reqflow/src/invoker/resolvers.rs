//! The canonical parameter resolvers.

use std::{any::TypeId, sync::Arc};

use reqflow_core::{
    ArgBag, ArgValue, Container, Request, RequestContext, controller::ParamSlot,
};

use super::ParamResolver;

/// Exact name match against the provided bag's named values.
pub struct AssociativeResolver;

impl ParamResolver for AssociativeResolver {
    fn can_resolve(&self, slot: &ParamSlot, provided: &ArgBag) -> bool {
        provided.get(slot.name()).is_some()
    }

    fn resolve(&self, slot: &ParamSlot, provided: &ArgBag) -> Option<ArgValue> {
        provided.get(slot.name()).cloned()
    }
}

/// Positional match: the provided bag's value at the slot's declaration
/// index.
pub struct PositionalResolver;

impl ParamResolver for PositionalResolver {
    fn can_resolve(&self, slot: &ParamSlot, provided: &ArgBag) -> bool {
        provided.position(slot.index()).is_some()
    }

    fn resolve(&self, slot: &ParamSlot, provided: &ArgBag) -> Option<ArgValue> {
        provided.position(slot.index()).cloned()
    }
}

/// Type-hint match: the first named bag value whose type equals the slot's
/// declared type.
pub struct TypedBagResolver;

impl ParamResolver for TypedBagResolver {
    fn can_resolve(&self, slot: &ParamSlot, provided: &ArgBag) -> bool {
        provided.by_type(slot.type_id()).is_some()
    }

    fn resolve(&self, slot: &ParamSlot, provided: &ArgBag) -> Option<ArgValue> {
        provided.by_type(slot.type_id()).cloned()
    }
}

/// Declared-default fallback.
pub struct DefaultValueResolver;

impl ParamResolver for DefaultValueResolver {
    fn can_resolve(&self, slot: &ParamSlot, _provided: &ArgBag) -> bool {
        slot.default().is_some()
    }

    fn resolve(&self, slot: &ParamSlot, _provided: &ArgBag) -> Option<ArgValue> {
        slot.default().cloned()
    }
}

/// Type-hint lookup in the collaborator container, keyed by the declared
/// type name. The entry must actually hold the declared type.
pub struct ContainerResolver {
    container: Arc<dyn Container>,
}

impl ContainerResolver {
    /// Resolve against `container`.
    pub fn new(container: Arc<dyn Container>) -> Self {
        Self { container }
    }
}

impl ParamResolver for ContainerResolver {
    fn can_resolve(&self, slot: &ParamSlot, _provided: &ArgBag) -> bool {
        self.container.has(slot.type_name())
    }

    fn resolve(&self, slot: &ParamSlot, _provided: &ArgBag) -> Option<ArgValue> {
        self.container
            .get(slot.type_name())
            .filter(|value| value.type_id() == slot.type_id())
    }
}

/// Supplies the live request for request-typed slots.
///
/// Bound to one in-flight request; the kernel prepends a fresh instance to
/// the chain on every call, so precedence comes from insertion position,
/// not from any hardcoded rule.
pub struct RequestResolver {
    ctx: RequestContext,
}

impl RequestResolver {
    /// Bind to the current request context.
    pub fn new(ctx: RequestContext) -> Self {
        Self { ctx }
    }
}

impl ParamResolver for RequestResolver {
    fn can_resolve(&self, slot: &ParamSlot, _provided: &ArgBag) -> bool {
        slot.type_id() == TypeId::of::<Request>() || slot.type_id() == TypeId::of::<RequestContext>()
    }

    fn resolve(&self, slot: &ParamSlot, _provided: &ArgBag) -> Option<ArgValue> {
        if slot.type_id() == TypeId::of::<Request>() {
            Some(ArgValue::new(self.ctx.request().clone()))
        } else if slot.type_id() == TypeId::of::<RequestContext>() {
            Some(ArgValue::new(self.ctx.clone()))
        } else {
            None
        }
    }
}
