//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The router holds handlers of *different* types in one
//! `BTreeMap<Method, Tree>`, so each one is hidden behind `dyn ErasedHandler`.
//!
//! ```text
//! async fn health(req: Request) -> Response { … }   ← plain async fn
//! move |req| users::get(store.clone(), req)         ← closure over a store
//!        ↓ router.on(Method::Get, path, handler)
//! handler.into_boxed_handler()                      ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(handler))                      ← BoxedHandler
//!        ↓
//! handler.call(req)  at request time                ← one vtable dispatch
//! ```
//!
//! The router itself and every middleware layer implement [`ErasedHandler`]
//! too, which is how the middleware stack wraps routing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` because it appears in the return type of the public
/// `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Automatically satisfied for any function or closure shaped like
///
/// ```text
/// Fn(Request) -> impl Future<Output = impl IntoResponse>
/// ```
///
/// Handlers that need a dependency capture it: the users API registers
/// closures that own an `Arc<dyn UserStore>` clone. The trait is sealed.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Bridges a concrete handler `F` to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::status::Status;

    #[tokio::test]
    async fn closures_capturing_state_are_handlers() {
        let greeting = Arc::new(String::from("hi"));
        let handler = move |_req: Request| {
            let greeting = Arc::clone(&greeting);
            async move { Response::json(greeting.as_str()) }
        };

        let res = handler.into_boxed_handler().call(Request::fake(Method::Get, "/", "")).await;
        assert_eq!(res.body(), br#""hi""#);
    }

    #[tokio::test]
    async fn status_return_values_become_responses() {
        async fn no_content(_req: Request) -> Status {
            Status::NoContent
        }

        let res = no_content.into_boxed_handler().call(Request::fake(Method::Get, "/", "")).await;
        assert_eq!(res.status_code(), 204);
    }
}
