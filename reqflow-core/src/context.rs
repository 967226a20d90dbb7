//! Request and response value types, and the per-call request context.
//!
//! [`Request`] and [`Response`] are owned, clonable values built on the
//! `http` crate's vocabulary types. They are treated as black boxes by the
//! kernels: read accessors plus `with_*` copy-producing mutators.
//!
//! [`RequestContext`] is the explicit per-call state threaded through every
//! kernel, middleware and listener call. The router's `_controller` and
//! `_params` attributes are modeled as typed optional fields instead of a
//! dynamic attribute map, and the kernels hold no request state of their
//! own, so one kernel instance stays safe under reentrant or concurrent
//! use.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};

use crate::{controller::ControllerRef, value::ArgBag};

/// An inbound HTTP request value.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Create a request with an empty header map and body.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request path.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Copy of this request with another method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Copy of this request with another URI.
    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.uri = uri;
        self
    }

    /// Copy of this request with a header appended.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Copy of this request with another body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// An outbound HTTP response value.
#[derive(Clone, Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Create an empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK).with_body(body)
    }

    /// The response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The response body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Copy of this response with another status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Copy of this response with a header appended.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Copy of this response with another body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Per-call request state threaded through kernels, listeners and
/// middleware.
#[derive(Clone, Debug)]
pub struct RequestContext {
    request: Request,
    controller: Option<ControllerRef>,
    params: ArgBag,
}

impl RequestContext {
    /// Wrap a bare request with no routing attributes attached.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            controller: None,
            params: ArgBag::new(),
        }
    }

    /// The request value.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Mutable access to the request value, for listeners and middleware
    /// that rewrite it in place.
    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// Replace the request value.
    pub fn with_request(mut self, request: Request) -> Self {
        self.request = request;
        self
    }

    /// The handler reference attached by the router, if any.
    pub fn controller(&self) -> Option<&ControllerRef> {
        self.controller.as_ref()
    }

    /// Attach a handler reference (the router's `_controller` attribute).
    pub fn with_controller(mut self, controller: impl Into<ControllerRef>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    /// The pre-known argument bag (the router's `_params` attribute).
    pub fn params(&self) -> &ArgBag {
        &self.params
    }

    /// Mutable access to the argument bag.
    pub fn params_mut(&mut self) -> &mut ArgBag {
        &mut self.params
    }

    /// Replace the argument bag.
    pub fn with_params(mut self, params: ArgBag) -> Self {
        self.params = params;
        self
    }
}
