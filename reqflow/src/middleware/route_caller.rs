//! Terminal middleware that invokes the routed controller.

use std::sync::Arc;

use reqflow_core::{
    Container, RequestContext, Response,
    controller::ControllerOutput,
    error::{ConfigError, KernelError},
};

use crate::invoker::{RequestResolver, ResolverChain};

use super::{Middleware, RequestHandler};

/// Invokes the controller the router attached to the request.
///
/// This is the middleware-chain counterpart of the event kernel's
/// controller stage: it resolves the handler reference, fills its
/// signature through the resolver chain (with the live request inserted at
/// top precedence) and invokes it. A raw `String` return becomes a `200`
/// response; anything else that is not already a response is a
/// configuration error. It never delegates to `next`: it terminates the
/// pipeline.
pub struct RouteCallerMiddleware {
    container: Arc<dyn Container>,
    resolver: ResolverChain,
}

impl RouteCallerMiddleware {
    /// Build over the collaborator container and a configured resolver
    /// chain.
    pub fn new(container: Arc<dyn Container>, resolver: ResolverChain) -> Self {
        Self { container, resolver }
    }
}

impl Middleware for RouteCallerMiddleware {
    fn process(
        &self,
        ctx: RequestContext,
        _next: &mut dyn RequestHandler,
    ) -> Result<Response, KernelError> {
        let Some(controller_ref) = ctx.controller() else {
            return Err(ConfigError::ControllerNotFound {
                path: ctx.request().path().to_owned(),
            }
            .into());
        };
        let controller = controller_ref.resolve(self.container.as_ref())?;

        let chain = self
            .resolver
            .prepend(Arc::new(RequestResolver::new(ctx.clone())));
        let params = chain.resolve(controller.signature(), ctx.params(), &[])?;

        match controller.invoke(params).map_err(KernelError::Handler)? {
            ControllerOutput::Response(response) => Ok(response),
            ControllerOutput::Raw(value) => match value.cloned::<String>() {
                Some(body) => Ok(Response::ok(body)),
                None => Err(ConfigError::NotAResponse {
                    returned: value.type_name().to_owned(),
                }
                .into()),
            },
        }
    }
}
