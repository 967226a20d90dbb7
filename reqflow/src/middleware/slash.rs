//! Trailing-slash redirection middleware.

use http::{HeaderValue, StatusCode, header};
use reqflow_core::{RequestContext, Response, error::KernelError};

use super::{Middleware, RequestHandler};

/// Permanently redirects `/some/path/` to `/some/path`.
///
/// The root path `/` is left alone. Paths that survive the check are
/// delegated unchanged.
pub struct TrailingSlashMiddleware;

impl Middleware for TrailingSlashMiddleware {
    fn process(
        &self,
        ctx: RequestContext,
        next: &mut dyn RequestHandler,
    ) -> Result<Response, KernelError> {
        let path = ctx.request().path();
        if path != "/" && path.ends_with('/') {
            let location = path.trim_end_matches('/');
            let location = if location.is_empty() { "/" } else { location };
            if let Ok(value) = HeaderValue::from_str(location) {
                return Ok(
                    Response::new(StatusCode::MOVED_PERMANENTLY).with_header(header::LOCATION, value)
                );
            }
        }
        next.handle(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Uri};
    use reqflow_core::Request;

    fn run(path: &'static str) -> Result<Response, KernelError> {
        let ctx = RequestContext::new(Request::new(Method::GET, Uri::from_static(path)));
        let mut fallthrough =
            |_ctx: RequestContext| Ok(Response::ok("fell through"));
        TrailingSlashMiddleware.process(ctx, &mut fallthrough)
    }

    #[test]
    fn redirects_trailing_slash_to_trimmed_path() {
        let response = run("/users/").unwrap();
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/users"
        );
    }

    #[test]
    fn leaves_root_and_clean_paths_alone() {
        assert_eq!(run("/").unwrap().body(), "fell through");
        assert_eq!(run("/users").unwrap().body(), "fell through");
    }
}
