//! Handler registry with ordered first-match resolution.
//!
//! A [`Handler`] both claims requests (`can_handle`) and answers them
//! (`handle`). The [`Router`] keeps handlers in registration order and
//! [`Router::resolve`] returns the first claimant, so registration order is
//! part of the routing contract: specific handlers go in before catch-alls.
//! [`RouterDispatcher`] adapts a router to the exchange layer's
//! [`Dispatcher`] seam, answering 404 when no handler claims a request.

use async_trait::async_trait;
use tracing::debug;

use turnstile_http::handler::Dispatcher;
use turnstile_http::protocol::{DispatchError, HttpRequest, ResponseEntity, StatusCode};

/// A unit capable of claiming and answering requests.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Whether this handler answers `request`.
    fn can_handle(&self, request: &HttpRequest) -> bool;

    /// Answers a request previously claimed via [`Handler::can_handle`].
    ///
    /// A handler that claims a path but not the request's method fails with
    /// [`DispatchError::UnsupportedMethod`]; the router does not catch it.
    async fn handle(&self, request: &HttpRequest) -> Result<ResponseEntity, DispatchError>;
}

/// Ordered handler registry, immutable once built.
pub struct Router {
    handlers: Vec<Box<dyn Handler>>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Returns the first handler claiming `request`, in registration order.
    ///
    /// `None` obliges the caller to produce a 404 response.
    pub fn resolve(&self, request: &HttpRequest) -> Option<&dyn Handler> {
        self.handlers.iter().map(|handler| handler.as_ref()).find(|handler| handler.can_handle(request))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

pub struct RouterBuilder {
    handlers: Vec<Box<dyn Handler>>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    /// Appends a handler; earlier registrations win over later ones.
    pub fn handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn build(self) -> Router {
        Router { handlers: self.handlers }
    }
}

/// Adapts a [`Router`] to the exchange layer's [`Dispatcher`] seam.
///
/// A request no handler claims answers `404 Not Found`; everything a
/// matched handler returns, including failures, passes through untouched.
pub struct RouterDispatcher {
    router: Router,
}

impl RouterDispatcher {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Dispatcher for RouterDispatcher {
    async fn dispatch(&self, request: HttpRequest) -> Result<ResponseEntity, DispatchError> {
        match self.router.resolve(&request) {
            Some(handler) => handler.handle(&request).await,
            None => {
                debug!(path = request.path(), "no handler matched");
                Ok(ResponseEntity::of(StatusCode::NotFound))
            }
        }
    }
}
