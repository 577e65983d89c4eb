//! The served application: a router wrapped in middleware.

use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::middleware::{self, Layered, Middleware};
use crate::request::Request;
use crate::router::Router;
use crate::store::UserStore;
use crate::{api, health};

/// A router plus its middleware stack. Cheap to clone; clones share the stack.
#[derive(Clone)]
pub struct App {
    root: BoxedHandler,
}

impl App {
    pub fn new(router: Router) -> Self {
        Self { root: Arc::new(Endpoint { router }) }
    }

    /// Wraps the current stack in `middleware`. The last layer added runs first.
    pub fn layer(self, middleware: impl Middleware) -> Self {
        Self { root: Arc::new(Layered::new(middleware, self.root)) }
    }

    /// The full users service: API routes under `prefix`, health probes, and
    /// `trace ⊃ json_content_type ⊃ cors ⊃ router`.
    pub fn users(store: Arc<dyn UserStore>, prefix: &str) -> Self {
        let router = api::routes(Router::new(), prefix, Arc::clone(&store));
        let router = health::routes(router, store);

        Self::new(router)
            .layer(middleware::cors)
            .layer(middleware::json_content_type)
            .layer(middleware::trace)
    }
}

impl ErasedHandler for App {
    fn call(&self, req: Request) -> BoxFuture {
        self.root.call(req)
    }
}

/// Bottom of the stack: a request rejected before routing gets its fixed
/// answer here, under every layer; anything else goes to the router.
struct Endpoint {
    router: Router,
}

impl ErasedHandler for Endpoint {
    fn call(&self, mut req: Request) -> BoxFuture {
        match req.rejection.take() {
            Some(res) => Box::pin(async move { res }),
            None => self.router.call(req),
        }
    }
}
