//! The combined middleware chain.

use reqflow_core::{Container, RequestContext, Response, error::KernelError};
use std::sync::Arc;

use super::{MiddlewareEntry, RequestHandler, resolve_middleware};

/// An ordered, lazily-advancing middleware chain.
///
/// The chain owns only the entry sequence; the advancing cursor lives in a
/// per-call run, so one chain value can serve successive or re-entrant
/// requests without shared cursor state.
#[derive(Clone)]
pub struct CombinedMiddleware {
    container: Arc<dyn Container>,
    entries: Vec<MiddlewareEntry>,
}

impl CombinedMiddleware {
    /// The container key a kernel fetches the application's chain from.
    pub const SERVICE_KEY: &'static str = "middleware.stack";

    /// Build a chain over `entries`, resolving `Service` entries from
    /// `container` at dispatch time.
    pub fn new(container: Arc<dyn Container>, entries: Vec<MiddlewareEntry>) -> Self {
        Self { container, entries }
    }

    /// Append one entry.
    pub fn middleware(&mut self, entry: impl Into<MiddlewareEntry>) -> &mut Self {
        self.entries.push(entry.into());
        self
    }

    /// Append many entries, in order.
    pub fn middlewares<I>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = MiddlewareEntry>,
    {
        self.entries.extend(entries);
        self
    }

    /// Insert an entry at position zero, ahead of everything registered so
    /// far.
    pub fn prepend_middleware(&mut self, entry: impl Into<MiddlewareEntry>) -> &mut Self {
        self.entries.insert(0, entry.into());
        self
    }

    /// The current ordered entry sequence, for inspection and testing.
    pub fn middleware_stack(&self) -> &[MiddlewareEntry] {
        &self.entries
    }

    /// Run the chain for one request.
    ///
    /// `final_handler` is the fallback "next" invoked if the sequence is
    /// exhausted without any entry producing a response. Each call starts a
    /// fresh cursor at the head of the sequence.
    pub fn process(
        &self,
        ctx: RequestContext,
        final_handler: &mut dyn RequestHandler,
    ) -> Result<Response, KernelError> {
        let mut run = ChainRun {
            chain: self,
            cursor: 0,
            fallback: final_handler,
        };
        run.handle(ctx)
    }
}

/// One in-flight traversal of a chain. Implements the "next" delegate the
/// entries call back into.
struct ChainRun<'a> {
    chain: &'a CombinedMiddleware,
    cursor: usize,
    fallback: &'a mut dyn RequestHandler,
}

impl RequestHandler for ChainRun<'_> {
    fn handle(&mut self, ctx: RequestContext) -> Result<Response, KernelError> {
        let chain = self.chain;
        let cursor = self.cursor;
        self.cursor += 1;
        match chain.entries.get(cursor) {
            None => self.fallback.handle(ctx),
            Some(MiddlewareEntry::Handler(middleware)) => middleware.process(ctx, self),
            Some(MiddlewareEntry::Callable(f)) => f(ctx, self),
            Some(MiddlewareEntry::Service(key)) => {
                tracing::trace!(service = %key, "resolving middleware from container");
                let middleware = resolve_middleware(chain.container.as_ref(), key)?;
                middleware.process(ctx, self)
            }
        }
    }
}
