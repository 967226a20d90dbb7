//! # reqflow-core
//!
//! Core traits and value types for the reqflow HTTP application kernel.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! listeners, middleware and extensions that don't need the full `reqflow`
//! kernels.
//!
//! # What lives here
//!
//! - **Events** ([`event`]): one payload type per lifecycle stage, sharing
//!   the [`Stoppable`] capability and a stable [`EventName`].
//! - **Dispatch** ([`dispatcher`]): the ordered, stoppable
//!   [`EventDispatcher`] with per-stage priority lists.
//! - **Request model** ([`context`]): clonable [`Request`]/[`Response`]
//!   value types and the per-call [`RequestContext`] threaded through
//!   every kernel call; kernels hold no request state of their own.
//! - **Handlers** ([`controller`]): the [`Controller`] seam, the explicit
//!   [`Signature`] model and lazily resolvable [`ControllerRef`]s.
//! - **Collaborators** ([`container`]): the two-method [`Container`]
//!   capability everything external is reached through.
//! - **Errors** ([`error`]): the [`KernelError`] hierarchy.

#![warn(missing_docs)]

pub mod container;
pub mod context;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod value;

pub use container::Container;
pub use context::{Request, RequestContext, Response};
pub use controller::{
    Controller, ControllerOutput, ControllerRef, FnController, ParamSlot, Signature,
    SignatureBuilder,
};
pub use dispatcher::{EventDispatcher, Listener, Subscriber};
pub use error::{BoxError, ConfigError, KernelError, ResolveError};
pub use event::{
    ControllerEvent, ControllerParamsEvent, EventName, ExceptionEvent, FinishRequestEvent,
    KernelEvent, RequestEvent, ResponseEvent, Stoppable, ViewEvent,
};
pub use value::{ArgBag, ArgValue};
