//! The middleware interceptor seam.
//!
//! A middleware receives the request context and a `next` delegate and
//! decides whether to call on into the rest of the pipeline or to return a
//! response directly, short-circuiting it. "Next" is an ordinary
//! synchronous call; there is no suspension point and no background work
//! anywhere in the chain.

mod combined;
mod method;
mod prefix;
mod route_caller;
mod slash;

pub use combined::CombinedMiddleware;
pub use method::MethodOverrideMiddleware;
pub use prefix::RoutePrefixMiddleware;
pub use route_caller::RouteCallerMiddleware;
pub use slash::TrailingSlashMiddleware;

use std::sync::Arc;

use reqflow_core::{
    Container, RequestContext, Response,
    error::{ConfigError, KernelError},
};

/// The "next" delegate a middleware may call to continue the pipeline.
pub trait RequestHandler {
    /// Produce a response for the request.
    fn handle(&mut self, ctx: RequestContext) -> Result<Response, KernelError>;
}

impl<F> RequestHandler for F
where
    F: FnMut(RequestContext) -> Result<Response, KernelError>,
{
    fn handle(&mut self, ctx: RequestContext) -> Result<Response, KernelError> {
        self(ctx)
    }
}

/// An interceptor in the middleware chain.
pub trait Middleware: Send + Sync {
    /// Process the request, either delegating to `next` or short-circuiting
    /// with a response of its own.
    fn process(
        &self,
        ctx: RequestContext,
        next: &mut dyn RequestHandler,
    ) -> Result<Response, KernelError>;
}

/// A plain callable usable as a middleware entry.
pub type MiddlewareFn =
    dyn Fn(RequestContext, &mut dyn RequestHandler) -> Result<Response, KernelError> + Send + Sync;

/// One entry of a middleware chain.
///
/// Entries come in three kinds, all resolved to the same invocable shape at
/// call time: a processor object, a plain callable, or a container key
/// looked up lazily at dispatch time (the chain itself caches nothing).
#[derive(Clone)]
pub enum MiddlewareEntry {
    /// A processor object.
    Handler(Arc<dyn Middleware>),
    /// A plain `(ctx, next) -> response` callable.
    Callable(Arc<MiddlewareFn>),
    /// A container key, resolved on first use per dispatch.
    Service(String),
}

impl MiddlewareEntry {
    /// Wrap a processor object.
    pub fn handler(middleware: impl Middleware + 'static) -> Self {
        MiddlewareEntry::Handler(Arc::new(middleware))
    }

    /// Wrap a plain callable.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(RequestContext, &mut dyn RequestHandler) -> Result<Response, KernelError>
            + Send
            + Sync
            + 'static,
    {
        MiddlewareEntry::Callable(Arc::new(f))
    }

    /// Reference a container entry by key.
    pub fn service(key: impl Into<String>) -> Self {
        MiddlewareEntry::Service(key.into())
    }
}

impl From<Arc<dyn Middleware>> for MiddlewareEntry {
    fn from(middleware: Arc<dyn Middleware>) -> Self {
        MiddlewareEntry::Handler(middleware)
    }
}

impl From<&str> for MiddlewareEntry {
    fn from(key: &str) -> Self {
        MiddlewareEntry::Service(key.to_owned())
    }
}

impl From<String> for MiddlewareEntry {
    fn from(key: String) -> Self {
        MiddlewareEntry::Service(key)
    }
}

/// Look up a middleware stored in the container under `key`.
///
/// The entry must hold an `Arc<dyn Middleware>`.
pub(crate) fn resolve_middleware(
    container: &dyn Container,
    key: &str,
) -> Result<Arc<dyn Middleware>, KernelError> {
    let value = container.get(key).ok_or_else(|| ConfigError::ServiceNotFound {
        key: key.to_owned(),
    })?;
    value
        .cloned::<Arc<dyn Middleware>>()
        .ok_or_else(|| {
            ConfigError::ServiceType {
                key: key.to_owned(),
                expected: "middleware",
            }
            .into()
        })
}
