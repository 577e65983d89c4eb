//! Per-request tracing.

use std::time::Instant;

use tracing::{Instrument, info, info_span, warn};

use super::Next;
use crate::request::Request;
use crate::response::Response;

/// Opens a span carrying method and path around the rest of the stack and
/// logs the outcome with its latency. 5xx outcomes log at `WARN`.
pub async fn trace(req: Request, next: Next) -> Response {
    let span = info_span!("request", method = %req.method_name(), path = %req.path());
    let started = Instant::now();

    async move {
        let res = next.run(req).await;
        let status = res.status_code();
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        if status >= 500 {
            warn!(status, latency_ms, "request failed");
        } else {
            info!(status, latency_ms, "request completed");
        }
        res
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use crate::method::Method;

    #[tokio::test]
    async fn passes_response_through_untouched() {
        let inner = |req: Request| async move { Response::json(req.path()) };
        let res = trace(Request::fake(Method::Get, "/users", ""), Next::new(inner.into_boxed_handler())).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), br#""/users""#);
    }
}
