//! Path-scoped lazy middleware.

use std::sync::Arc;

use reqflow_core::{Container, RequestContext, Response, error::KernelError};

use super::{Middleware, RequestHandler, resolve_middleware};

/// Wraps a single container-resolved middleware and runs it only for
/// requests whose path starts with a configured prefix.
///
/// The wrapped middleware is looked up lazily, so piping a prefix costs
/// nothing until a matching request arrives. The prefix compare is
/// case-insensitive, and an empty prefix matches every path.
pub struct RoutePrefixMiddleware {
    container: Arc<dyn Container>,
    prefix: String,
    service: String,
}

impl RoutePrefixMiddleware {
    /// Scope the container entry `service` to paths under `prefix`.
    pub fn new(
        container: Arc<dyn Container>,
        prefix: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            container,
            prefix: prefix.into(),
            service: service.into(),
        }
    }

    fn matches(&self, path: &str) -> bool {
        path.get(..self.prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(&self.prefix))
    }
}

impl Middleware for RoutePrefixMiddleware {
    fn process(
        &self,
        ctx: RequestContext,
        next: &mut dyn RequestHandler,
    ) -> Result<Response, KernelError> {
        if self.matches(ctx.request().path()) {
            let middleware = resolve_middleware(self.container.as_ref(), &self.service)?;
            middleware.process(ctx, next)
        } else {
            next.handle(ctx)
        }
    }
}
