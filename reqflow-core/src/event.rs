//! Lifecycle stage events and stoppable propagation.
//!
//! Every stage of the request lifecycle dispatches one event. Events share
//! a small capability surface, a stable [`EventName`] and a one-way stop
//! flag ([`Stoppable`]), and carry a stage-specific mutable payload.
//! Dispatch is generic over the [`KernelEvent`] capability, never over
//! concrete payload types.
//!
//! Events are created per stage and per request, consumed by the
//! dispatcher, and dismantled with `into_parts` so the kernel reclaims the
//! request context. They are never persisted.
//!
//! The force-stop rule: on the [`RequestEvent`], [`ViewEvent`] and
//! [`ExceptionEvent`], setting a response always stops propagation;
//! producing a response ends that stage. On the [`ResponseEvent`] the
//! response is always present and replacing it does *not* stop
//! propagation, so every response listener gets its turn.

use std::{any::Any, fmt, sync::Arc};

use crate::{
    context::{Request, RequestContext, Response},
    controller::Controller,
    error::BoxError,
    value::ArgValue,
};

/// Names of the fixed lifecycle stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventName {
    /// Inbound request received; may short-circuit with a response.
    Request,
    /// Controller resolved; may be replaced.
    Controller,
    /// Controller arguments resolved; controller and arguments replaceable.
    ControllerParams,
    /// Controller returned a raw value; a listener must convert it.
    View,
    /// A concrete response exists and may be filtered.
    Response,
    /// An uncaught failure is up for recovery.
    Exception,
    /// The request is finished; notification only.
    FinishRequest,
}

impl EventName {
    /// Stable string form, used for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Request => "kernel.request",
            EventName::Controller => "kernel.controller",
            EventName::ControllerParams => "kernel.controller_params",
            EventName::View => "kernel.view",
            EventName::Response => "kernel.response",
            EventName::Exception => "kernel.exception",
            EventName::FinishRequest => "kernel.finish_request",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-way propagation stop flag.
pub trait Stoppable {
    /// Stop propagation: no further listener runs for this dispatch.
    fn stop_propagation(&mut self);

    /// Whether propagation has been stopped.
    fn is_propagation_stopped(&self) -> bool;
}

/// A dispatchable lifecycle event: stoppable, with a fixed stage name.
pub trait KernelEvent: Stoppable + Any {
    /// The stage this event belongs to.
    const NAME: EventName;
}

macro_rules! impl_stoppable {
    ($($event:ident),+ $(,)?) => {
        $(impl Stoppable for $event {
            fn stop_propagation(&mut self) {
                self.stopped = true;
            }

            fn is_propagation_stopped(&self) -> bool {
                self.stopped
            }
        })+
    };
}

impl_stoppable!(
    RequestEvent,
    ControllerEvent,
    ControllerParamsEvent,
    ViewEvent,
    ResponseEvent,
    ExceptionEvent,
    FinishRequestEvent,
);

/// Dispatched when a request enters the kernel, before any routing state
/// is consulted. A listener that sets a response bypasses the controller
/// entirely.
pub struct RequestEvent {
    ctx: RequestContext,
    response: Option<Response>,
    stopped: bool,
}

impl RequestEvent {
    /// Wrap the inbound context.
    pub fn new(ctx: RequestContext) -> Self {
        Self {
            ctx,
            response: None,
            stopped: false,
        }
    }

    /// The request being handled.
    pub fn request(&self) -> &Request {
        self.ctx.request()
    }

    /// The full request context.
    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    /// Mutable request context, for listeners that rewrite the request or
    /// its routing attributes.
    pub fn context_mut(&mut self) -> &mut RequestContext {
        &mut self.ctx
    }

    /// The early response, if a listener set one.
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Whether a response has been set.
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// Set an early response. Always stops propagation.
    pub fn set_response(&mut self, response: Response) {
        self.response = Some(response);
        self.stop_propagation();
    }

    /// Dismantle into the context and the optional early response.
    pub fn into_parts(self) -> (RequestContext, Option<Response>) {
        (self.ctx, self.response)
    }
}

impl KernelEvent for RequestEvent {
    const NAME: EventName = EventName::Request;
}

/// Dispatched once the controller reference has been resolved; listeners
/// may substitute the invocable.
pub struct ControllerEvent {
    ctx: RequestContext,
    controller: Arc<dyn Controller>,
    stopped: bool,
}

impl ControllerEvent {
    /// Wrap the context and the resolved controller.
    pub fn new(ctx: RequestContext, controller: Arc<dyn Controller>) -> Self {
        Self {
            ctx,
            controller,
            stopped: false,
        }
    }

    /// The request being handled.
    pub fn request(&self) -> &Request {
        self.ctx.request()
    }

    /// The controller that will be invoked.
    pub fn controller(&self) -> &Arc<dyn Controller> {
        &self.controller
    }

    /// Replace the controller.
    pub fn set_controller(&mut self, controller: Arc<dyn Controller>) {
        self.controller = controller;
    }

    /// Dismantle into the context and the (possibly substituted)
    /// controller.
    pub fn into_parts(self) -> (RequestContext, Arc<dyn Controller>) {
        (self.ctx, self.controller)
    }
}

impl KernelEvent for ControllerEvent {
    const NAME: EventName = EventName::Controller;
}

/// Dispatched after argument resolution; listeners may substitute the
/// controller and/or the ordered argument list.
pub struct ControllerParamsEvent {
    ctx: RequestContext,
    controller: Arc<dyn Controller>,
    params: Vec<ArgValue>,
    stopped: bool,
}

impl ControllerParamsEvent {
    /// Wrap the context, controller and resolved arguments.
    pub fn new(ctx: RequestContext, controller: Arc<dyn Controller>, params: Vec<ArgValue>) -> Self {
        Self {
            ctx,
            controller,
            params,
            stopped: false,
        }
    }

    /// The request being handled.
    pub fn request(&self) -> &Request {
        self.ctx.request()
    }

    /// The controller that will be invoked.
    pub fn controller(&self) -> &Arc<dyn Controller> {
        &self.controller
    }

    /// Replace the controller.
    pub fn set_controller(&mut self, controller: Arc<dyn Controller>) {
        self.controller = controller;
    }

    /// The resolved argument list, in declaration order.
    pub fn params(&self) -> &[ArgValue] {
        &self.params
    }

    /// Replace the argument list.
    pub fn set_params(&mut self, params: Vec<ArgValue>) {
        self.params = params;
    }

    /// Dismantle into context, controller and arguments.
    pub fn into_parts(self) -> (RequestContext, Arc<dyn Controller>, Vec<ArgValue>) {
        (self.ctx, self.controller, self.params)
    }
}

impl KernelEvent for ControllerParamsEvent {
    const NAME: EventName = EventName::ControllerParams;
}

/// Dispatched when the controller returned something that is not a
/// response; a listener must convert the raw value.
pub struct ViewEvent {
    ctx: RequestContext,
    value: ArgValue,
    response: Option<Response>,
    stopped: bool,
}

impl ViewEvent {
    /// Wrap the context and the controller's raw return value.
    pub fn new(ctx: RequestContext, value: ArgValue) -> Self {
        Self {
            ctx,
            value,
            response: None,
            stopped: false,
        }
    }

    /// The request being handled.
    pub fn request(&self) -> &Request {
        self.ctx.request()
    }

    /// The controller's raw return value.
    pub fn value(&self) -> &ArgValue {
        &self.value
    }

    /// The converted response, if a listener produced one.
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Whether a response has been set.
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// Set the converted response. Always stops propagation.
    pub fn set_response(&mut self, response: Response) {
        self.response = Some(response);
        self.stop_propagation();
    }

    /// Dismantle into context, raw value and optional response.
    pub fn into_parts(self) -> (RequestContext, ArgValue, Option<Response>) {
        (self.ctx, self.value, self.response)
    }
}

impl KernelEvent for ViewEvent {
    const NAME: EventName = EventName::View;
}

/// Dispatched with the concrete response before it is returned to the
/// caller; listeners may filter or replace it.
pub struct ResponseEvent {
    ctx: RequestContext,
    response: Response,
    stopped: bool,
}

impl ResponseEvent {
    /// Wrap the context and the response to filter.
    pub fn new(ctx: RequestContext, response: Response) -> Self {
        Self {
            ctx,
            response,
            stopped: false,
        }
    }

    /// The request being handled.
    pub fn request(&self) -> &Request {
        self.ctx.request()
    }

    /// The response as filtered so far.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Replace the response. Does not stop propagation: later filters
    /// still run.
    pub fn set_response(&mut self, response: Response) {
        self.response = response;
    }

    /// Dismantle into the context and the filtered response.
    pub fn into_parts(self) -> (RequestContext, Response) {
        (self.ctx, self.response)
    }
}

impl KernelEvent for ResponseEvent {
    const NAME: EventName = EventName::Response;
}

/// Dispatched when an uncaught failure reaches the kernel boundary; a
/// listener may attach a recovery response and/or replace the failure.
pub struct ExceptionEvent {
    ctx: RequestContext,
    exception: BoxError,
    response: Option<Response>,
    stopped: bool,
}

impl ExceptionEvent {
    /// Wrap the context and the failure.
    pub fn new(ctx: RequestContext, exception: BoxError) -> Self {
        Self {
            ctx,
            exception,
            response: None,
            stopped: false,
        }
    }

    /// The request being handled.
    pub fn request(&self) -> &Request {
        self.ctx.request()
    }

    /// The failure under recovery.
    pub fn exception(&self) -> &BoxError {
        &self.exception
    }

    /// Replace the failure.
    pub fn set_exception(&mut self, exception: BoxError) {
        self.exception = exception;
    }

    /// The recovery response, if a listener attached one.
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Whether a recovery response has been attached.
    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    /// Attach a recovery response. Always stops propagation.
    pub fn set_response(&mut self, response: Response) {
        self.response = Some(response);
        self.stop_propagation();
    }

    /// Dismantle into context, (possibly replaced) failure and optional
    /// recovery response.
    pub fn into_parts(self) -> (RequestContext, BoxError, Option<Response>) {
        (self.ctx, self.exception, self.response)
    }
}

impl KernelEvent for ExceptionEvent {
    const NAME: EventName = EventName::Exception;
}

/// Fire-and-forget notification that a request has finished; carries no
/// response.
pub struct FinishRequestEvent {
    ctx: RequestContext,
    stopped: bool,
}

impl FinishRequestEvent {
    /// Wrap the finished request's context.
    pub fn new(ctx: RequestContext) -> Self {
        Self {
            ctx,
            stopped: false,
        }
    }

    /// The request that finished.
    pub fn request(&self) -> &Request {
        self.ctx.request()
    }

    /// Dismantle into the context.
    pub fn into_parts(self) -> RequestContext {
        self.ctx
    }
}

impl KernelEvent for FinishRequestEvent {
    const NAME: EventName = EventName::FinishRequest;
}
