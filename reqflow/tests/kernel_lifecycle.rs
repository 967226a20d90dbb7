//! End-to-end lifecycle coverage for the event-driven kernel.

mod common;

use std::sync::Arc;

use common::{
    Counter, Recorder, counting_controller, failing_controller, init_tracing, raw_controller,
    text_controller, unit_controller,
};
use reqflow::{
    ArgValue, ConfigError, ControllerEvent, ControllerParamsEvent, EventDispatcher, EventKernel,
    ExceptionEvent, FinishRequestEvent, Kernel, KernelError, RequestEvent, Response, ResponseEvent,
    ResolverChain, Signature, ViewEvent,
    testing::{TestContainer, context},
};
use http::StatusCode;

fn kernel(dispatcher: EventDispatcher) -> EventKernel {
    let container: Arc<TestContainer> = Arc::new(TestContainer::new());
    EventKernel::new(dispatcher, ResolverChain::default_chain(container.clone()), container)
}

fn kernel_with(dispatcher: EventDispatcher, container: TestContainer) -> EventKernel {
    let container: Arc<TestContainer> = Arc::new(container);
    EventKernel::new(dispatcher, ResolverChain::default_chain(container.clone()), container)
}

fn count_finishes(dispatcher: &mut EventDispatcher, counter: &Counter) {
    let counter = counter.clone();
    dispatcher.add_listener(
        move |_event: &mut FinishRequestEvent| {
            counter.bump();
            Ok(())
        },
        0,
    );
}

fn body_text(response: &Response) -> String {
    String::from_utf8(response.body().to_vec()).unwrap()
}

#[test]
fn missing_controller_raises_a_routing_error_naming_the_path() {
    init_tracing();
    let mut dispatcher = EventDispatcher::new();
    let finishes = Counter::new();
    count_finishes(&mut dispatcher, &finishes);
    let kernel = kernel(dispatcher);

    let error = kernel.handle(context("/missing")).unwrap_err();
    match error {
        KernelError::Config(ConfigError::ControllerNotFound { path }) => {
            assert_eq!(path, "/missing");
        }
        other => panic!("unexpected error: {other}"),
    }
    // The exception stage still closes the request out.
    assert_eq!(finishes.get(), 1);
}

#[test]
fn early_response_bypasses_the_controller_entirely() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(
        |event: &mut RequestEvent| {
            if event.request().path() == "/maintenance" {
                event.set_response(Response::new(StatusCode::SERVICE_UNAVAILABLE));
            }
            Ok(())
        },
        0,
    );
    let finishes = Counter::new();
    count_finishes(&mut dispatcher, &finishes);
    let kernel = kernel(dispatcher);

    let invocations = Counter::new();
    let ctx = context("/maintenance")
        .with_controller(counting_controller("never", invocations.clone()));

    let response = kernel.handle(ctx).unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(invocations.get(), 0);
    assert_eq!(finishes.get(), 1);
}

#[test]
fn happy_path_filters_the_response_and_finishes_once() {
    let mut dispatcher = EventDispatcher::new();
    let order = Recorder::new();
    {
        let order = order.clone();
        dispatcher.add_listener(
            move |event: &mut ResponseEvent| {
                order.push("filter-a");
                let filtered = event.response().clone().with_status(StatusCode::CREATED);
                event.set_response(filtered);
                Ok(())
            },
            10,
        );
    }
    {
        // Replacing the response never stops the stage: this one still runs.
        let order = order.clone();
        dispatcher.add_listener(
            move |_event: &mut ResponseEvent| {
                order.push("filter-b");
                Ok(())
            },
            0,
        );
    }
    let finishes = Counter::new();
    count_finishes(&mut dispatcher, &finishes);
    let kernel = kernel(dispatcher);

    let ctx = context("/hello").with_controller(text_controller("hello"));
    let response = kernel.handle(ctx).unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_text(&response), "hello");
    assert_eq!(order.take(), vec!["filter-a", "filter-b"]);
    assert_eq!(finishes.get(), 1);
}

#[test]
fn controller_stage_listeners_can_substitute_the_handler() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(
        |event: &mut ControllerEvent| {
            event.set_controller(text_controller("substituted"));
            Ok(())
        },
        0,
    );
    let kernel = kernel(dispatcher);

    let ctx = context("/swap").with_controller(text_controller("original"));
    let response = kernel.handle(ctx).unwrap();
    assert_eq!(body_text(&response), "substituted");
}

#[test]
fn params_stage_listeners_can_rewrite_the_argument_list() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(
        |event: &mut ControllerParamsEvent| {
            event.set_params(vec![ArgValue::new("rewritten".to_string())]);
            Ok(())
        },
        0,
    );
    let kernel = kernel(dispatcher);

    let signature = Signature::builder().slot::<String>("name").build();
    let echo = common::echo_controller(signature);
    let mut ctx = context("/echo").with_controller(echo);
    ctx.params_mut().insert("name", "routed".to_string());

    let response = kernel.handle(ctx).unwrap();
    assert_eq!(body_text(&response), "name=rewritten");
}

#[test]
fn view_listeners_convert_raw_controller_results() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(
        |event: &mut ViewEvent| {
            if let Some(text) = event.value().cloned::<&'static str>() {
                event.set_response(Response::ok(text));
            }
            Ok(())
        },
        0,
    );
    let kernel = kernel(dispatcher);

    let ctx = context("/raw").with_controller(raw_controller("rendered"));
    let response = kernel.handle(ctx).unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(&response), "rendered");
}

#[test]
fn unconverted_raw_results_fail_naming_the_returned_type() {
    let kernel = kernel(EventDispatcher::new());
    let ctx = context("/raw").with_controller(raw_controller(42_u64));

    let error = kernel.handle(ctx).unwrap_err();
    match error {
        KernelError::Config(ConfigError::NotAResponse { returned }) => {
            assert!(returned.contains("u64"), "got: {returned}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unit_results_get_the_forgot_return_hint() {
    let kernel = kernel(EventDispatcher::new());
    let ctx = context("/forgot").with_controller(unit_controller());

    let error = kernel.handle(ctx).unwrap_err();
    assert!(
        error
            .to_string()
            .contains("Did you forget to add a return statement"),
        "got: {error}"
    );
}

#[test]
fn exception_listeners_can_attach_a_recovery_response() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(
        |event: &mut ExceptionEvent| {
            let body = format!("recovered: {}", event.exception());
            event.set_response(Response::new(StatusCode::INTERNAL_SERVER_ERROR).with_body(body));
            Ok(())
        },
        0,
    );
    let finishes = Counter::new();
    count_finishes(&mut dispatcher, &finishes);
    let kernel = kernel(dispatcher);

    let ctx = context("/boom").with_controller(failing_controller("database unreachable"));
    let response = kernel.handle(ctx).unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(&response).contains("database unreachable"));
    assert_eq!(finishes.get(), 1);
}

#[test]
fn exception_listeners_see_request_stage_mutations() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(
        |event: &mut RequestEvent| {
            let request = event.request().clone().with_header(
                http::HeaderName::from_static("x-request-id"),
                http::HeaderValue::from_static("req-7"),
            );
            *event.context_mut().request_mut() = request;
            Ok(())
        },
        0,
    );
    dispatcher.add_listener(
        |event: &mut ExceptionEvent| {
            let id = event
                .request()
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("missing")
                .to_owned();
            event.set_response(Response::ok(id));
            Ok(())
        },
        0,
    );
    let kernel = kernel(dispatcher);

    // No controller attached: the run fails after the request stage, and
    // the exception stage must see the mutated request.
    let response = kernel.handle(context("/untagged")).unwrap();
    assert_eq!(body_text(&response), "req-7");
}

#[test]
fn exception_listeners_can_replace_the_failure() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(
        |event: &mut ExceptionEvent| {
            event.set_exception("translated failure".into());
            Ok(())
        },
        0,
    );
    let finishes = Counter::new();
    count_finishes(&mut dispatcher, &finishes);
    let kernel = kernel(dispatcher);

    let ctx = context("/boom").with_controller(failing_controller("raw failure"));
    let error = kernel.handle(ctx).unwrap_err();

    assert!(error.to_string().contains("translated failure"));
    assert_eq!(finishes.get(), 1);
}

#[test]
fn broken_filtering_during_recovery_falls_back_to_the_unfiltered_response() {
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_listener(
        |event: &mut ExceptionEvent| {
            event.set_response(Response::new(StatusCode::BAD_GATEWAY));
            Ok(())
        },
        0,
    );
    dispatcher.add_listener(
        |_event: &mut ResponseEvent| Err("response filter broke".into()),
        0,
    );
    let kernel = kernel(dispatcher);

    let ctx = context("/boom").with_controller(failing_controller("handler failure"));
    let response = kernel.handle(ctx).unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn service_controller_references_resolve_through_the_container() {
    let mut container = TestContainer::new();
    container.insert_controller("controller.greet", text_controller("from container"));
    let kernel = kernel_with(EventDispatcher::new(), container);

    let ctx = context("/greet").with_controller("controller.greet");
    let response = kernel.handle(ctx).unwrap();
    assert_eq!(body_text(&response), "from container");
}

#[test]
fn dangling_service_controller_references_are_reported() {
    let kernel = kernel(EventDispatcher::new());
    let ctx = context("/greet").with_controller("controller.gone");

    let error = kernel.handle(ctx).unwrap_err();
    assert!(error.to_string().contains("controller.gone"), "got: {error}");
}

#[test]
fn an_empty_subscriber_batch_is_rejected() {
    let mut kernel = kernel(EventDispatcher::new());
    let Err(error) = kernel.set_callbacks(Vec::new()) else {
        panic!("an empty batch must be rejected");
    };
    assert!(matches!(
        error,
        KernelError::Config(ConfigError::EmptyCallbacks)
    ));
}
