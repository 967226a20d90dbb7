//! HTTP method override middleware.

use http::Method;
use reqflow_core::{RequestContext, Response, error::KernelError};

use super::{Middleware, RequestHandler};

/// Name of the override header honored by [`MethodOverrideMiddleware`].
pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method-override";

/// Rewrites the request method when a client that can only send `GET`/
/// `POST` (an HTML form, a constrained proxy) asks for `DELETE`, `PUT` or
/// `PATCH` through the `X-Http-Method-Override` header. Any other value is
/// ignored.
pub struct MethodOverrideMiddleware;

impl Middleware for MethodOverrideMiddleware {
    fn process(
        &self,
        mut ctx: RequestContext,
        next: &mut dyn RequestHandler,
    ) -> Result<Response, KernelError> {
        let override_method = ctx
            .request()
            .headers()
            .get(METHOD_OVERRIDE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| match value.to_ascii_uppercase().as_str() {
                "DELETE" => Some(Method::DELETE),
                "PUT" => Some(Method::PUT),
                "PATCH" => Some(Method::PATCH),
                _ => None,
            });

        if let Some(method) = override_method {
            let request = ctx.request().clone().with_method(method);
            ctx = ctx.with_request(request);
        }
        next.handle(ctx)
    }
}
