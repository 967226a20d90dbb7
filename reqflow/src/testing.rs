//! Testing utilities for reqflow.
//!
//! - [`TestContainer`]: a map-backed collaborator container
//! - [`request`] / [`context`]: quick request fixtures

use std::{any::Any, collections::HashMap, sync::Arc};

use http::{Method, Uri};
use reqflow_core::{
    ArgValue, Container, Request, RequestContext,
    controller::Controller,
};

use crate::middleware::{CombinedMiddleware, Middleware};

/// A map-backed [`Container`] for tests and examples.
#[derive(Default)]
pub struct TestContainer {
    entries: HashMap<String, ArgValue>,
}

impl TestContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an arbitrary value under `key`.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) -> &mut Self {
        self.entries.insert(key.into(), ArgValue::new(value));
        self
    }

    /// Insert a middleware under `key`, stored the way
    /// [`MiddlewareEntry::Service`] entries expect to find it.
    ///
    /// [`MiddlewareEntry::Service`]: crate::middleware::MiddlewareEntry::Service
    pub fn insert_middleware(
        &mut self,
        key: impl Into<String>,
        middleware: Arc<dyn Middleware>,
    ) -> &mut Self {
        self.insert(key, middleware)
    }

    /// Insert a controller under `key`, stored the way
    /// [`ControllerRef::Service`] references expect to find it.
    ///
    /// [`ControllerRef::Service`]: reqflow_core::ControllerRef::Service
    pub fn insert_controller(
        &mut self,
        key: impl Into<String>,
        controller: Arc<dyn Controller>,
    ) -> &mut Self {
        self.insert(key, controller)
    }

    /// Insert a combined middleware chain under the key
    /// [`MiddlewareKernel::handle`] fetches it from.
    ///
    /// [`MiddlewareKernel::handle`]: crate::kernel::MiddlewareKernel
    pub fn insert_chain(&mut self, chain: CombinedMiddleware) -> &mut Self {
        self.insert(CombinedMiddleware::SERVICE_KEY, chain)
    }
}

impl Container for TestContainer {
    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<ArgValue> {
        self.entries.get(key).cloned()
    }
}

/// A `GET` request for a static path.
pub fn request(path: &'static str) -> Request {
    Request::new(Method::GET, Uri::from_static(path))
}

/// A bare request context for a static path, with no routing attributes.
pub fn context(path: &'static str) -> RequestContext {
    RequestContext::new(request(path))
}
