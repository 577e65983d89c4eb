//! Middleware layer.
//!
//! Middleware wraps the router and sees every request and response. It is the
//! place for cross-cutting concerns that must not leak into handlers.
//!
//! Any `async fn(Request, Next) -> Response` is a middleware:
//!
//! ```rust
//! use tsu_users::middleware::Next;
//! use tsu_users::{Request, Response};
//!
//! async fn server_header(req: Request, next: Next) -> Response {
//!     let mut res = next.run(req).await;
//!     res.set_header(http::header::SERVER, "tsu-users");
//!     res
//! }
//! ```
//!
//! Built-in middleware:
//! - [`cors`] permissive CORS headers, `OPTIONS` short-circuit
//! - [`json_content_type`] `Content-Type: application/json` on every response
//! - [`trace`] per-request span with method, path, status, latency

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxedHandler, ErasedHandler};
use crate::request::Request;
use crate::response::Response;

mod content_type;
mod cors;
mod trace;

pub use content_type::json_content_type;
pub use cors::cors;
pub use trace::trace;
pub use crate::handler::BoxFuture;

/// The rest of the stack below a middleware.
pub struct Next {
    inner: BoxedHandler,
}

impl Next {
    pub(crate) fn new(inner: BoxedHandler) -> Self {
        Self { inner }
    }

    /// Hands the request to the inner layers and waits for their response.
    pub async fn run(self, req: Request) -> Response {
        self.inner.call(req).await
    }
}

/// A request/response decorator. Blanket-implemented for
/// `Fn(Request, Next) -> impl Future<Output = Response>`.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        Box::pin((self)(req, next))
    }
}

/// One middleware bound to the stack it wraps.
pub(crate) struct Layered {
    middleware: Arc<dyn Middleware>,
    inner: BoxedHandler,
}

impl Layered {
    pub(crate) fn new(middleware: impl Middleware, inner: BoxedHandler) -> Self {
        Self { middleware: Arc::new(middleware), inner }
    }
}

impl ErasedHandler for Layered {
    fn call(&self, req: Request) -> BoxFuture {
        self.middleware.call(req, Next::new(Arc::clone(&self.inner)))
    }
}
