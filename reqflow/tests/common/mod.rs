//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use reqflow::{
    ArgValue, BoxError, Controller, ControllerOutput, FnController, Response, Signature,
};

/// Install a test subscriber once; repeated calls are fine.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Records labels in invocation order, behind a cheap clone.
#[derive(Clone, Default)]
pub struct Recorder {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, label: impl Into<String>) {
        self.entries.lock().unwrap().push(label.into());
    }

    pub fn take(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

/// Counts invocations.
#[derive(Clone, Default)]
pub struct Counter {
    count: Arc<AtomicUsize>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// A no-argument controller returning a complete text response.
pub fn text_controller(body: &'static str) -> Arc<dyn Controller> {
    Arc::new(FnController::new(Signature::default(), move |_args| {
        Ok(ControllerOutput::Response(Response::ok(body)))
    }))
}

/// Like [`text_controller`], but also counts invocations.
pub fn counting_controller(body: &'static str, counter: Counter) -> Arc<dyn Controller> {
    Arc::new(FnController::new(Signature::default(), move |_args| {
        counter.bump();
        Ok(ControllerOutput::Response(Response::ok(body)))
    }))
}

/// A controller returning a raw value for the view stage.
pub fn raw_controller<T: Clone + Send + Sync + 'static>(value: T) -> Arc<dyn Controller> {
    Arc::new(FnController::new(Signature::default(), move |_args| {
        Ok(ControllerOutput::Raw(ArgValue::new(value.clone())))
    }))
}

/// A controller that forgot its return statement.
pub fn unit_controller() -> Arc<dyn Controller> {
    Arc::new(FnController::new(Signature::default(), |_args| {
        Ok(ControllerOutput::raw(()))
    }))
}

/// A controller that always fails.
pub fn failing_controller(message: &'static str) -> Arc<dyn Controller> {
    Arc::new(FnController::new(Signature::default(), move |_args| {
        Err(BoxError::from(message))
    }))
}

/// A controller that echoes its resolved arguments as `name=value` pairs,
/// for signature/resolution assertions.
pub fn echo_controller(signature: Signature) -> Arc<dyn Controller> {
    let names: Vec<String> = signature
        .slots()
        .iter()
        .map(|slot| slot.name().to_owned())
        .collect();
    Arc::new(FnController::new(signature, move |args| {
        let mut parts = Vec::new();
        for (name, value) in names.iter().zip(&args) {
            let rendered = value
                .cloned::<String>()
                .or_else(|| value.cloned::<u64>().map(|n| n.to_string()))
                .unwrap_or_else(|| value.type_name().to_owned());
            parts.push(format!("{name}={rendered}"));
        }
        Ok(ControllerOutput::Response(Response::ok(parts.join("&"))))
    }))
}
