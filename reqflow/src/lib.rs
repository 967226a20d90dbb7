//! # reqflow - Request Lifecycle Kernels
//!
//! `reqflow` is the request-processing core of a small HTTP application
//! kernel: a request comes in, gets resolved to a controller, the
//! controller's arguments get filled, and exactly one response goes out,
//! with every stage observable and short-circuitable by external code.
//!
//! Two kernel strategies converge on that contract:
//!
//! - **[`EventKernel`]**: a fixed lifecycle with pluggable observers.
//!   Each stage dispatches a stoppable event; any listener can hand back a
//!   response early (a cache hit at the request stage bypasses the
//!   controller entirely), convert raw controller returns at the view
//!   stage, or recover from failures at the exception stage.
//! - **[`MiddlewareKernel`]**: an ordered interceptor chain. Each entry
//!   wraps the remainder of the chain as its "next" handler and decides
//!   whether to continue or to short-circuit.
//!
//! ## Quick Start (event kernel)
//!
//! ```rust,ignore
//! use reqflow::prelude::*;
//!
//! let mut dispatcher = EventDispatcher::new();
//! dispatcher.add_listener::<RequestEvent, _>(
//!     |event: &mut RequestEvent| {
//!         // a listener may short-circuit the whole lifecycle
//!         Ok(())
//!     },
//!     0,
//! );
//!
//! let kernel = EventKernel::new(
//!     dispatcher,
//!     ResolverChain::default_chain(container.clone()),
//!     container,
//! );
//! let response = kernel.handle(ctx)?;
//! ```
//!
//! Routing, container wiring and body parsing are external collaborators:
//! a router attaches a [`ControllerRef`] and an [`ArgBag`] to the
//! [`RequestContext`] before the kernel runs, and everything string-keyed
//! is resolved lazily through the [`Container`] capability.

#![warn(missing_docs)]

pub mod invoker;
pub mod kernel;
pub mod middleware;
pub mod testing;

pub use reqflow_core::{
    ArgBag, ArgValue, BoxError, ConfigError, Container, Controller, ControllerEvent,
    ControllerOutput, ControllerParamsEvent, ControllerRef, EventDispatcher, EventName,
    ExceptionEvent, FinishRequestEvent, FnController, KernelError, KernelEvent, Listener,
    ParamSlot, Request, RequestContext, RequestEvent, ResolveError, Response, ResponseEvent,
    Signature, SignatureBuilder, Stoppable, Subscriber, ViewEvent,
};

pub use invoker::{ParamResolver, RequestResolver, ResolverChain};
pub use kernel::{EventKernel, Kernel, MiddlewareKernel};
pub use middleware::{
    CombinedMiddleware, Middleware, MiddlewareEntry, RequestHandler, RoutePrefixMiddleware,
};

/// Prelude module - common imports for reqflow.
///
/// # Usage
///
/// ```rust,ignore
/// use reqflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ArgBag, ArgValue, BoxError, CombinedMiddleware, Container, Controller, ControllerOutput,
        ControllerRef, EventDispatcher, EventKernel, EventName, Kernel, KernelError, Listener,
        Middleware, MiddlewareEntry, MiddlewareKernel, ParamResolver, Request, RequestContext,
        RequestEvent, RequestHandler, ResolverChain, Response, ResponseEvent, Signature,
        Stoppable, Subscriber, ViewEvent,
    };
}
