//! JSON content-type enforcement.

use http::header::CONTENT_TYPE;

use super::Next;
use crate::request::Request;
use crate::response::Response;

/// Marks every response as `application/json`, whatever the inner stack set.
pub async fn json_content_type(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    res.set_header(CONTENT_TYPE, "application/json");
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Handler;
    use crate::method::Method;
    use crate::status::Status;

    #[tokio::test]
    async fn overrides_inner_content_type() {
        let inner = |_req: Request| async { Response::text("plain") };
        let res = json_content_type(Request::fake(Method::Get, "/", ""), Next::new(inner.into_boxed_handler())).await;
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(res.headers().len(), 1);
    }

    #[tokio::test]
    async fn applies_to_bodiless_responses() {
        let inner = |_req: Request| async { Status::InternalServerError };
        let res = json_content_type(Request::fake(Method::Get, "/", ""), Next::new(inner.into_boxed_handler())).await;
        assert_eq!(res.status_code(), 500);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
    }
}
