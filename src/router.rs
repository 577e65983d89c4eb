//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A path that exists for a
//! different method answers 405 with an `Allow` header; anything else is 404.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and hand it to [`App::new`](crate::App::new).
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: BTreeMap<Method, MatchitRouter<BoxedHandler>>,
}

/// Outcome of matching a method + path pair.
pub(crate) enum Lookup {
    Found(BoxedHandler, HashMap<String, String>),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: BTreeMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust
    /// # use tsu_users::{Method, Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn delete_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Delete, "/users/{id}", delete_user)
    ///     .on(Method::Get,    "/users/{id}", get_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route template or collides with an
    /// existing route for the same method.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    pub(crate) fn lookup(&self, method: Method, path: &str) -> Lookup {
        if let Some(matched) = self.routes.get(&method).and_then(|tree| tree.at(path).ok()) {
            let handler = Arc::clone(matched.value);
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            return Lookup::Found(handler, params);
        }

        let allowed: Vec<Method> = self.routes.iter()
            .filter(|(m, tree)| **m != method && tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();

        if allowed.is_empty() { Lookup::NotFound } else { Lookup::MethodNotAllowed(allowed) }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

impl ErasedHandler for Router {
    fn call(&self, req: Request) -> BoxFuture {
        match self.lookup(req.method(), req.path()) {
            Lookup::Found(handler, params) => handler.call(req.with_params(params)),
            Lookup::MethodNotAllowed(allowed) => {
                let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
                let res = Response::builder()
                    .status(Status::MethodNotAllowed)
                    .header("allow", &allow)
                    .json("Method Not Allowed");
                Box::pin(async move { res })
            }
            Lookup::NotFound => {
                let res = Response::builder().status(Status::NotFound).json("Not Found");
                Box::pin(async move { res })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn echo_id(req: Request) -> Response {
        Response::json(req.param("id").unwrap_or_default())
    }

    async fn ok(_req: Request) -> Response {
        Response::json("ok")
    }

    fn router() -> Router {
        Router::new()
            .on(Method::Get, "/users", ok)
            .on(Method::Get, "/users/{id}", echo_id)
            .on(Method::Put, "/users/{id}", echo_id)
            .on(Method::Delete, "/users/{id}", echo_id)
    }

    #[tokio::test]
    async fn extracts_path_params() {
        let res = router().call(Request::fake(Method::Put, "/users/17", "")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), br#""17""#);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let res = router().call(Request::fake(Method::Get, "/orders", "")).await;
        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn known_path_with_other_method_lists_allowed_methods() {
        let res = router().call(Request::fake(Method::Post, "/users/1", "")).await;
        assert_eq!(res.status_code(), 405);
        assert_eq!(res.headers()["allow"], "DELETE, GET, PUT");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = Router::new()
            .on(Method::Get, "/users/{id}", ok)
            .on(Method::Get, "/users/{id}", ok);
    }
}
