//! Type-erased argument values and the provided-argument bag.
//!
//! Controllers are invoked with a positional list of [`ArgValue`]s, and the
//! router attaches pre-known arguments to the request as an [`ArgBag`]
//! (positional and named). Values are cheap to clone: the payload lives
//! behind an `Arc`, so resolvers can hand the same value to several
//! consumers without copying it.

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

/// A cheap-clone, type-erased argument value.
///
/// The declared type name is captured at construction so resolution errors
/// and view-stage diagnostics can name what a value actually was.
#[derive(Clone)]
pub struct ArgValue {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl ArgValue {
    /// Wrap a value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The `TypeId` of the wrapped value.
    pub fn type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    /// The declared type name of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the wrapped value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the wrapped value as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clone the wrapped value out as a `T`.
    pub fn cloned<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArgValue").field(&self.type_name).finish()
    }
}

/// Positional and named argument values attached to a request before
/// reflection-based resolution runs.
///
/// Named entries keep insertion order; lookups by declared type consider
/// named entries only, matching the associative type-hint resolver's
/// contract.
#[derive(Clone, Debug, Default)]
pub struct ArgBag {
    positional: Vec<ArgValue>,
    named: Vec<(String, ArgValue)>,
}

impl ArgBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional value.
    pub fn push<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.positional.push(ArgValue::new(value));
        self
    }

    /// Insert a named value. A repeated name shadows the earlier entry for
    /// name lookups but keeps it for type lookups.
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) -> &mut Self {
        self.named.push((name.into(), ArgValue::new(value)));
        self
    }

    /// Look up a named value.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.named
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Look up a positional value.
    pub fn position(&self, index: usize) -> Option<&ArgValue> {
        self.positional.get(index)
    }

    /// Find the first named value whose wrapped type matches `type_id`.
    pub fn by_type(&self, type_id: TypeId) -> Option<&ArgValue> {
        self.named
            .iter()
            .find(|(_, value)| value.type_id() == type_id)
            .map(|(_, value)| value)
    }

    /// Number of values in the bag, positional and named.
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    /// Whether the bag holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}
