//! The invocable handler ("controller") model.
//!
//! A controller is any invocable that accepts a resolved, positional
//! argument list and returns either a complete [`Response`] or a raw value
//! destined for the view stage. Since Rust has no runtime reflection, a
//! controller declares its signature explicitly as an ordered list of
//! [`ParamSlot`]s; the resolver chain fills those slots.

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

use crate::{
    container::Container,
    context::Response,
    error::{BoxError, ResolveError},
    value::ArgValue,
};

/// One declared parameter of a controller's signature.
#[derive(Clone, Debug)]
pub struct ParamSlot {
    name: String,
    index: usize,
    type_id: TypeId,
    type_name: &'static str,
    default: Option<ArgValue>,
}

impl ParamSlot {
    /// Declared parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position in the signature.
    pub fn index(&self) -> usize {
        self.index
    }

    /// `TypeId` of the declared type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Name of the declared type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Declared default value, if any.
    pub fn default(&self) -> Option<&ArgValue> {
        self.default.as_ref()
    }
}

/// The reflected signature of a controller: its parameter slots in
/// declaration order.
#[derive(Clone, Debug, Default)]
pub struct Signature {
    slots: Vec<ParamSlot>,
}

impl Signature {
    /// Start building a signature.
    pub fn builder() -> SignatureBuilder {
        SignatureBuilder { slots: Vec::new() }
    }

    /// The parameter slots in declaration order.
    pub fn slots(&self) -> &[ParamSlot] {
        &self.slots
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the signature declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Builder for [`Signature`]; slot indices follow declaration order.
pub struct SignatureBuilder {
    slots: Vec<ParamSlot>,
}

impl SignatureBuilder {
    /// Declare a required parameter of type `T`.
    pub fn slot<T: Any>(mut self, name: impl Into<String>) -> Self {
        let index = self.slots.len();
        self.slots.push(ParamSlot {
            name: name.into(),
            index,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            default: None,
        });
        self
    }

    /// Declare a parameter of type `T` with a default value.
    pub fn slot_with_default<T: Any + Send + Sync>(
        mut self,
        name: impl Into<String>,
        default: T,
    ) -> Self {
        let index = self.slots.len();
        self.slots.push(ParamSlot {
            name: name.into(),
            index,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            default: Some(ArgValue::new(default)),
        });
        self
    }

    /// Finish the signature.
    pub fn build(self) -> Signature {
        Signature { slots: self.slots }
    }
}

/// What a controller invocation produced.
pub enum ControllerOutput {
    /// A complete response; the view stage is skipped.
    Response(Response),
    /// A raw value to be converted by a view listener.
    Raw(ArgValue),
}

impl From<Response> for ControllerOutput {
    fn from(response: Response) -> Self {
        ControllerOutput::Response(response)
    }
}

impl ControllerOutput {
    /// Wrap an arbitrary value for the view stage.
    pub fn raw<T: Any + Send + Sync>(value: T) -> Self {
        ControllerOutput::Raw(ArgValue::new(value))
    }
}

/// An invocable request handler.
pub trait Controller: Send + Sync {
    /// The declared parameter list, in order.
    fn signature(&self) -> &Signature;

    /// Invoke with the fully resolved, positional argument list.
    fn invoke(&self, args: Vec<ArgValue>) -> Result<ControllerOutput, BoxError>;
}

/// Adapts a closure plus an explicit [`Signature`] into a [`Controller`].
pub struct FnController<F> {
    signature: Signature,
    f: F,
}

impl<F> FnController<F>
where
    F: Fn(Vec<ArgValue>) -> Result<ControllerOutput, BoxError> + Send + Sync,
{
    /// Wrap `f` with its declared signature.
    pub fn new(signature: Signature, f: F) -> Self {
        Self { signature, f }
    }
}

impl<F> Controller for FnController<F>
where
    F: Fn(Vec<ArgValue>) -> Result<ControllerOutput, BoxError> + Send + Sync,
{
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn invoke(&self, args: Vec<ArgValue>) -> Result<ControllerOutput, BoxError> {
        (self.f)(args)
    }
}

/// The handler reference the router attaches to a request.
///
/// A `Service` reference is resolved lazily through the collaborator
/// container; a `Handler` reference is already invocable.
#[derive(Clone)]
pub enum ControllerRef {
    /// An already-resolved handler.
    Handler(Arc<dyn Controller>),
    /// A container key to resolve at dispatch time.
    Service(String),
}

impl ControllerRef {
    /// Resolve this reference to an invocable handler.
    ///
    /// `Service` keys are looked up in the container and must hold an
    /// `Arc<dyn Controller>`.
    pub fn resolve(&self, container: &dyn Container) -> Result<Arc<dyn Controller>, ResolveError> {
        match self {
            ControllerRef::Handler(controller) => Ok(controller.clone()),
            ControllerRef::Service(key) => container
                .get(key)
                .and_then(|value| value.cloned::<Arc<dyn Controller>>())
                .ok_or_else(|| ResolveError::NotInvocable { key: key.clone() }),
        }
    }
}

impl From<Arc<dyn Controller>> for ControllerRef {
    fn from(controller: Arc<dyn Controller>) -> Self {
        ControllerRef::Handler(controller)
    }
}

impl From<&str> for ControllerRef {
    fn from(key: &str) -> Self {
        ControllerRef::Service(key.to_owned())
    }
}

impl From<String> for ControllerRef {
    fn from(key: String) -> Self {
        ControllerRef::Service(key)
    }
}

impl fmt::Debug for ControllerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerRef::Handler(_) => f.write_str("ControllerRef::Handler"),
            ControllerRef::Service(key) => f.debug_tuple("ControllerRef::Service").field(key).finish(),
        }
    }
}
