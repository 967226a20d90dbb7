//! The two kernel strategies.
//!
//! [`EventKernel`] drives a fixed lifecycle of dispatched stage events;
//! [`MiddlewareKernel`] delegates one request to an ordered interceptor
//! chain. Both take a request context in and produce exactly one terminal
//! response (or a failure) out, and neither holds any per-request state on
//! the instance. The context is an explicit argument everywhere.

mod event;
mod middleware;

pub use event::EventKernel;
pub use middleware::MiddlewareKernel;

use reqflow_core::{RequestContext, Response, error::{BoxError, KernelError}};

/// A request kernel: one request in, one response out.
pub trait Kernel: Send + Sync {
    /// Handle a request to completion.
    fn handle(&self, ctx: RequestContext) -> Result<Response, KernelError>;

    /// Handle an uncaught failure raised while handling `ctx`.
    fn handle_exception(
        &self,
        error: BoxError,
        ctx: RequestContext,
    ) -> Result<Response, KernelError>;
}
