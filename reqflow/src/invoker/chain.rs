//! The ordered resolver chain.

use std::sync::Arc;

use reqflow_core::{
    ArgBag, ArgValue, Container,
    controller::Signature,
    error::ResolveError,
};

use super::{
    AssociativeResolver, ContainerResolver, DefaultValueResolver, ParamResolver,
    PositionalResolver, TypedBagResolver,
};

/// An ordered sequence of [`ParamResolver`]s.
///
/// Order is significant: when several resolvers could fill the same slot,
/// the earliest one in the chain wins. The chain itself is cheap to copy
/// (resolvers sit behind `Arc`s), so a per-request variant with an extra
/// head resolver costs one small `Vec` clone.
#[derive(Clone)]
pub struct ResolverChain {
    resolvers: Vec<Arc<dyn ParamResolver>>,
}

impl ResolverChain {
    /// Build a chain from an explicit resolver list.
    pub fn new(resolvers: Vec<Arc<dyn ParamResolver>>) -> Self {
        Self { resolvers }
    }

    /// The canonical default chain, highest precedence first: exact name
    /// match, positional match, type-hint match against the named bag,
    /// declared default, type-hint lookup in the collaborator container.
    pub fn default_chain(container: Arc<dyn Container>) -> Self {
        Self::new(vec![
            Arc::new(AssociativeResolver),
            Arc::new(PositionalResolver),
            Arc::new(TypedBagResolver),
            Arc::new(DefaultValueResolver),
            Arc::new(ContainerResolver::new(container)),
        ])
    }

    /// Append a resolver during setup.
    pub fn push(&mut self, resolver: Arc<dyn ParamResolver>) -> &mut Self {
        self.resolvers.push(resolver);
        self
    }

    /// A copy of this chain with `resolver` inserted ahead of everything
    /// else. Used per request to give a live-request resolver top
    /// precedence by insertion position.
    pub fn prepend(&self, resolver: Arc<dyn ParamResolver>) -> Self {
        let mut resolvers = Vec::with_capacity(self.resolvers.len() + 1);
        resolvers.push(resolver);
        resolvers.extend(self.resolvers.iter().cloned());
        Self { resolvers }
    }

    /// Number of resolvers in the chain.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Produce the final ordered argument list for `signature`.
    ///
    /// Slots already present in `already_resolved` (keyed by declaration
    /// index) are returned unchanged. Each remaining slot is offered to
    /// every resolver in chain order; the first supplier wins. A slot no
    /// resolver fills is an error naming the slot and its declared type.
    pub fn resolve(
        &self,
        signature: &Signature,
        provided: &ArgBag,
        already_resolved: &[(usize, ArgValue)],
    ) -> Result<Vec<ArgValue>, ResolveError> {
        let mut filled: Vec<Option<ArgValue>> = vec![None; signature.len()];
        for (index, value) in already_resolved {
            if *index < filled.len() {
                filled[*index] = Some(value.clone());
            }
        }

        for slot in signature.slots() {
            if filled[slot.index()].is_some() {
                continue;
            }
            for resolver in &self.resolvers {
                if !resolver.can_resolve(slot, provided) {
                    continue;
                }
                if let Some(value) = resolver.resolve(slot, provided) {
                    filled[slot.index()] = Some(value);
                    break;
                }
            }
        }

        signature
            .slots()
            .iter()
            .zip(filled)
            .map(|(slot, value)| {
                value.ok_or_else(|| ResolveError::UnresolvableParam {
                    name: slot.name().to_owned(),
                    type_name: slot.type_name(),
                })
            })
            .collect()
    }
}
