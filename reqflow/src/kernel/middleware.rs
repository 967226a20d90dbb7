//! The middleware-chain request kernel.

use std::sync::Arc;

use reqflow_core::{
    Container, RequestContext, Response,
    error::{BoxError, ConfigError, KernelError},
};

use crate::middleware::{
    CombinedMiddleware, MiddlewareEntry, RequestHandler, RoutePrefixMiddleware,
};

use super::Kernel;

/// A thin driver over the combined middleware chain.
///
/// `handle` fetches the application's chain from the collaborator
/// container (under [`CombinedMiddleware::SERVICE_KEY`]), appends this
/// kernel's own piped entries, and runs it with a fall-through guard:
/// if the sequence is exhausted without any entry producing a response,
/// the request fails. The kernel never fabricates a response on its own
/// authority.
pub struct MiddlewareKernel {
    container: Arc<dyn Container>,
    callbacks: Vec<MiddlewareEntry>,
}

impl MiddlewareKernel {
    /// Build over the collaborator container.
    pub fn new(container: Arc<dyn Container>) -> Self {
        Self {
            container,
            callbacks: Vec::new(),
        }
    }

    /// The collaborator container.
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// Register a batch of middleware entries. An empty batch is a
    /// configuration error.
    pub fn set_callbacks(
        &mut self,
        entries: Vec<MiddlewareEntry>,
    ) -> Result<&mut Self, KernelError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyCallbacks.into());
        }
        self.callbacks.extend(entries);
        Ok(self)
    }

    /// Pipe a container-resolved middleware onto the chain, scoped to
    /// paths under `prefix`. Resolution happens lazily, on the first
    /// matching request.
    pub fn pipe(&mut self, prefix: impl Into<String>, service: impl Into<String>) -> &mut Self {
        self.callbacks.push(MiddlewareEntry::handler(
            RoutePrefixMiddleware::new(self.container.clone(), prefix, service),
        ));
        self
    }
}

impl Kernel for MiddlewareKernel {
    fn handle(&self, ctx: RequestContext) -> Result<Response, KernelError> {
        let mut chain = self
            .container
            .get(CombinedMiddleware::SERVICE_KEY)
            .ok_or_else(|| ConfigError::ServiceNotFound {
                key: CombinedMiddleware::SERVICE_KEY.to_owned(),
            })?
            .cloned::<CombinedMiddleware>()
            .ok_or(ConfigError::ServiceType {
                key: CombinedMiddleware::SERVICE_KEY.to_owned(),
                expected: "combined middleware chain",
            })?;
        chain.middlewares(self.callbacks.iter().cloned());

        let mut fallthrough = Fallthrough;
        chain.process(ctx, &mut fallthrough)
    }

    /// No recovery here: re-raise unconditionally. Converting failures
    /// into responses is the job of an error-handling middleware entry,
    /// not of this kernel.
    fn handle_exception(
        &self,
        error: BoxError,
        _ctx: RequestContext,
    ) -> Result<Response, KernelError> {
        Err(KernelError::from_boxed(error))
    }
}

/// Final handler installed under the chain: reaching it means no
/// middleware intercepted the request.
struct Fallthrough;

impl RequestHandler for Fallthrough {
    fn handle(&mut self, _ctx: RequestContext) -> Result<Response, KernelError> {
        Err(ConfigError::NoMiddlewareIntercepted.into())
    }
}
