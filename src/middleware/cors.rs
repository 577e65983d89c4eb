//! Permissive CORS.
//!
//! The users API is called straight from a browser frontend on another
//! origin, so every response carries the same three headers and preflight
//! requests never reach the router.

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};

use super::Next;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

const ALLOW_ORIGIN: &str = "*";
const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Sets the CORS headers on every response. `OPTIONS` requests are answered
/// here with an empty `200 OK` and never reach the inner stack.
pub async fn cors(req: Request, next: Next) -> Response {
    let mut res = if req.method() == Method::Options {
        Response::status(Status::Ok)
    } else {
        next.run(req).await
    };

    res.set_header(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN);
    res.set_header(ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS);
    res.set_header(ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS);
    res
}
