//! Kubernetes health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the store be reached? Failure → pulled from load-balancer. |
//!
//! Both live outside the API prefix so probes keep working whatever prefix
//! the deployment chose.

use std::sync::Arc;

use tracing::warn;

use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;
use crate::store::UserStore;

/// Registers `/healthz` and `/readyz`.
pub fn routes(router: Router, store: Arc<dyn UserStore>) -> Router {
    router
        .on(Method::Get, "/healthz", liveness)
        .on(Method::Get, "/readyz", move |req: Request| readiness(Arc::clone(&store), req))
}

/// Always `200 OK` with `"ok"`. No dependencies: answering at all is the signal.
pub async fn liveness(_req: Request) -> Response {
    Response::json("ok")
}

/// `200 OK` with `"ready"` when the store answers a ping, `503` otherwise.
pub async fn readiness(store: Arc<dyn UserStore>, _req: Request) -> Response {
    match store.ping().await {
        Ok(()) => Response::json("ready"),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            Response::builder().status(Status::ServiceUnavailable).json(&e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::ErasedHandler;
    use crate::store::tests::memory_store;

    #[tokio::test]
    async fn probes_answer_while_store_is_up() {
        let router = routes(Router::new(), Arc::new(memory_store().await));

        let live = router.call(Request::fake(Method::Get, "/healthz", "")).await;
        assert_eq!((live.status_code(), live.body()), (200, &br#""ok""#[..]));

        let ready = router.call(Request::fake(Method::Get, "/readyz", "")).await;
        assert_eq!((ready.status_code(), ready.body()), (200, &br#""ready""#[..]));
    }

    #[tokio::test]
    async fn readiness_fails_once_store_is_closed() {
        let store = memory_store().await;
        let router = routes(Router::new(), Arc::new(store.clone()));
        store.close().await;

        let ready = router.call(Request::fake(Method::Get, "/readyz", "")).await;
        assert_eq!(ready.status_code(), 503);
    }
}
