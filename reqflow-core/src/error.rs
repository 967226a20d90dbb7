//! Error types for reqflow.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`KernelError`] - Top-level error type for all kernel operations
//! - [`ConfigError`] - Fatal configuration errors, never retried
//! - [`ResolveError`] - Controller and parameter resolution failures
//!
//! Application failures raised by listeners and handlers are carried as
//! boxed sources; the kernel catches them exactly once, at its boundary,
//! and funnels them through the exception stage.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all kernel operations.
#[derive(Error, Debug)]
pub enum KernelError {
    /// The kernel or its collaborators are misconfigured.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A controller reference or parameter slot could not be resolved.
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// A listener raised during dispatch.
    #[error("listener error: {0}")]
    Listener(#[source] BoxError),

    /// The controller (or a callable middleware) raised during invocation.
    #[error("handler error: {0}")]
    Handler(#[source] BoxError),

    /// An application error that is not one of the kernel's own kinds.
    #[error(transparent)]
    Other(BoxError),
}

/// Fatal configuration errors, surfaced immediately and never retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The router did not attach a controller reference to the request.
    #[error("no controller found for this request, route {path} may be misconfigured")]
    ControllerNotFound {
        /// Path of the unmatched request.
        path: String,
    },

    /// Neither the controller nor a view listener produced a response.
    #[error("controller must return a Response, got {returned}")]
    NotAResponse {
        /// Description of what the controller actually returned.
        returned: String,
    },

    /// The middleware chain fell through without producing a response.
    #[error("no middleware intercepted this request")]
    NoMiddlewareIntercepted,

    /// `set_callbacks` was given nothing to register.
    #[error("a list of listeners or middlewares must be passed to this kernel")]
    EmptyCallbacks,

    /// A lazily referenced service is missing from the container.
    #[error("service \"{key}\" not found in container")]
    ServiceNotFound {
        /// Container key that was looked up.
        key: String,
    },

    /// A container entry exists but holds the wrong type.
    #[error("service \"{key}\" is not a {expected}")]
    ServiceType {
        /// Container key that was looked up.
        key: String,
        /// What the caller needed the entry to be.
        expected: &'static str,
    },
}

/// Errors raised while resolving controllers or their arguments.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// No resolver supplied a required slot and the slot has no default.
    #[error("unresolvable argument \"{name}\" of type {type_name}")]
    UnresolvableParam {
        /// Declared parameter name.
        name: String,
        /// Declared parameter type.
        type_name: &'static str,
    },

    /// A controller reference did not resolve to an invocable handler.
    #[error("controller reference \"{key}\" is not resolvable to a handler")]
    NotInvocable {
        /// The service key or reference description.
        key: String,
    },
}

impl KernelError {
    /// Recover a `KernelError` from a boxed error, preserving the original
    /// variant when the box holds one. Used when re-raising a (possibly
    /// replaced) failure after the exception stage declined to recover.
    pub fn from_boxed(err: BoxError) -> Self {
        match err.downcast::<KernelError>() {
            Ok(kernel) => *kernel,
            Err(other) => KernelError::Other(other),
        }
    }
}

impl From<BoxError> for KernelError {
    fn from(err: BoxError) -> Self {
        KernelError::Other(err)
    }
}
