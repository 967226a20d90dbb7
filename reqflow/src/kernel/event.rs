//! The event-driven request kernel.

use std::sync::Arc;

use reqflow_core::{
    Container, RequestContext, Response,
    controller::ControllerOutput,
    dispatcher::{EventDispatcher, Subscriber},
    error::{BoxError, ConfigError, KernelError},
    event::{
        ControllerEvent, ControllerParamsEvent, ExceptionEvent, FinishRequestEvent, KernelEvent,
        RequestEvent, ResponseEvent, ViewEvent,
    },
};

use crate::invoker::{RequestResolver, ResolverChain};

use super::Kernel;

/// Drives the fixed request lifecycle:
/// Request → Controller → ControllerParams → invoke → View → Response →
/// FinishRequest, with every stage observable and short-circuitable
/// through ordinary listener registration.
///
/// The kernel instance is long-lived and holds only its collaborators; the
/// in-flight request travels as a [`RequestContext`] argument through
/// every call, so one instance is safe under reentrant use.
pub struct EventKernel {
    dispatcher: EventDispatcher,
    resolver: ResolverChain,
    container: Arc<dyn Container>,
}

impl EventKernel {
    /// Assemble a kernel from its collaborators.
    pub fn new(
        dispatcher: EventDispatcher,
        resolver: ResolverChain,
        container: Arc<dyn Container>,
    ) -> Self {
        Self {
            dispatcher,
            resolver,
            container,
        }
    }

    /// The dispatcher, for inspection.
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Mutable dispatcher access for the registration phase. Registration
    /// must finish before the kernel starts serving.
    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    /// The collaborator container.
    pub fn container(&self) -> &Arc<dyn Container> {
        &self.container
    }

    /// Register a batch of subscribers. An empty batch is a configuration
    /// error.
    pub fn set_callbacks(
        &mut self,
        subscribers: Vec<Arc<dyn Subscriber>>,
    ) -> Result<&mut Self, KernelError> {
        if subscribers.is_empty() {
            return Err(ConfigError::EmptyCallbacks.into());
        }
        for subscriber in subscribers {
            self.dispatcher.add_subscriber(subscriber.as_ref());
        }
        Ok(self)
    }

    fn dispatch<E: KernelEvent>(&self, event: E) -> Result<E, KernelError> {
        self.dispatcher.dispatch(event).map_err(KernelError::Listener)
    }

    /// Lifecycle steps 1–5: everything up to (but excluding) response
    /// filtering. Returns the response together with the context it was
    /// produced under; a failure carries the context as far as it was
    /// threaded, so exception listeners see listener mutations.
    fn run(&self, ctx: RequestContext) -> Result<(Response, RequestContext), RunFailure> {
        let event = self
            .dispatch(RequestEvent::new(ctx))
            .map_err(RunFailure::lost)?;
        let (ctx, early) = event.into_parts();
        if let Some(response) = early {
            tracing::debug!(path = %ctx.request().path(), "request stage produced an early response");
            return Ok((response, ctx));
        }

        let Some(controller_ref) = ctx.controller().cloned() else {
            let error = ConfigError::ControllerNotFound {
                path: ctx.request().path().to_owned(),
            };
            return Err(RunFailure::at(error.into(), ctx));
        };
        let controller = match controller_ref.resolve(self.container.as_ref()) {
            Ok(controller) => controller,
            Err(error) => return Err(RunFailure::at(error.into(), ctx)),
        };

        let event = self
            .dispatch(ControllerEvent::new(ctx, controller))
            .map_err(RunFailure::lost)?;
        let (ctx, controller) = event.into_parts();

        // The live request always wins request-typed slots: prepended, so
        // precedence comes from position in the chain.
        let chain = self
            .resolver
            .prepend(Arc::new(RequestResolver::new(ctx.clone())));
        let params = match chain.resolve(controller.signature(), ctx.params(), &[]) {
            Ok(params) => params,
            Err(error) => return Err(RunFailure::at(error.into(), ctx)),
        };

        let event = self
            .dispatch(ControllerParamsEvent::new(ctx, controller, params))
            .map_err(RunFailure::lost)?;
        let (ctx, controller, params) = event.into_parts();

        let output = match controller.invoke(params) {
            Ok(output) => output,
            Err(error) => return Err(RunFailure::at(KernelError::Handler(error), ctx)),
        };
        match output {
            ControllerOutput::Response(response) => Ok((response, ctx)),
            ControllerOutput::Raw(value) => {
                let returned = value.type_name();
                let event = self
                    .dispatch(ViewEvent::new(ctx, value))
                    .map_err(RunFailure::lost)?;
                let (ctx, _value, response) = event.into_parts();
                match response {
                    Some(response) => Ok((response, ctx)),
                    None => {
                        let mut description = returned.to_owned();
                        if returned == "()" {
                            description.push_str(
                                ". Did you forget to add a return statement somewhere in your controller?",
                            );
                        }
                        let error = ConfigError::NotAResponse {
                            returned: description,
                        };
                        Err(RunFailure::at(error.into(), ctx))
                    }
                }
            }
        }
    }

    /// Step 6: the Response stage followed unconditionally by the
    /// FinishRequest notification.
    fn filter_response(
        &self,
        response: Response,
        ctx: RequestContext,
    ) -> Result<Response, KernelError> {
        let event = self.dispatch(ResponseEvent::new(ctx, response))?;
        let (ctx, response) = event.into_parts();
        self.finish_request(ctx)?;
        Ok(response)
    }

    fn finish_request(&self, ctx: RequestContext) -> Result<(), KernelError> {
        self.dispatch(FinishRequestEvent::new(ctx))?;
        Ok(())
    }
}

/// A failed lifecycle run, carrying the request context where it was
/// still owned at the point of failure. Listener failures inside a
/// dispatch lose the context to the consumed event.
struct RunFailure {
    error: KernelError,
    ctx: Option<RequestContext>,
}

impl RunFailure {
    fn at(error: KernelError, ctx: RequestContext) -> Self {
        Self {
            error,
            ctx: Some(ctx),
        }
    }

    fn lost(error: KernelError) -> Self {
        Self { error, ctx: None }
    }
}

impl Kernel for EventKernel {
    fn handle(&self, ctx: RequestContext) -> Result<Response, KernelError> {
        // Only needed when a failing dispatch swallowed the live context.
        let fallback_ctx = ctx.clone();
        let (response, ctx) = match self.run(ctx) {
            Ok(produced) => produced,
            Err(failure) => {
                let ctx = failure.ctx.unwrap_or(fallback_ctx);
                return self.handle_exception(Box::new(failure.error), ctx);
            }
        };
        self.filter_response(response, ctx)
    }

    fn handle_exception(
        &self,
        error: BoxError,
        ctx: RequestContext,
    ) -> Result<Response, KernelError> {
        tracing::debug!(path = %ctx.request().path(), error = %error, "entering exception stage");
        let event = self
            .dispatch(ExceptionEvent::new(ctx, error))?;
        let (ctx, error, response) = event.into_parts();

        let Some(response) = response else {
            self.finish_request(ctx)?;
            return Err(KernelError::from_boxed(error));
        };

        // A broken response filter must not mask a successful recovery:
        // fall back to the unfiltered recovery response.
        match self.filter_response(response.clone(), ctx) {
            Ok(filtered) => Ok(filtered),
            Err(filter_error) => {
                tracing::debug!(error = %filter_error, "response filtering failed during recovery");
                Ok(response)
            }
        }
    }
}
