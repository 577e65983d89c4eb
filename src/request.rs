//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::method::Method;
use crate::response::Response;

/// An incoming HTTP request with its body already collected.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    /// Method token as sent, kept only when it is not a [`Method`].
    pub(crate) unknown_method: Option<String>,
    /// Answer fixed before routing. The innermost handler returns it as is.
    pub(crate) rejection: Option<Response>,
}

impl Request {
    pub(crate) fn new(method: Method, path: impl Into<String>, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body,
            params: HashMap::new(),
            unknown_method: None,
            rejection: None,
        }
    }

    /// A request that must be answered with `res` instead of being routed.
    /// It still passes through every middleware layer on the way.
    pub(crate) fn rejected(mut self, res: Response) -> Self {
        self.rejection = Some(res);
        self
    }

    /// Records a method token outside [`Method`]. `method()` keeps reporting
    /// the placeholder the request was built with; `method_name()` has the token.
    pub(crate) fn with_unknown_method(mut self, token: impl Into<String>) -> Self {
        self.unknown_method = Some(token.into());
        self
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> Method { self.method }

    /// The method as sent on the wire, including tokens [`Method`] has no variant for.
    pub fn method_name(&self) -> &str {
        self.unknown_method.as_deref().unwrap_or(self.method.as_str())
    }

    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Header lookup. Names are case-insensitive; non-UTF-8 values read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the body as JSON. Unknown fields are ignored unless `T` says otherwise.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
impl Request {
    /// Test helper: a request with no headers.
    pub(crate) fn fake(method: Method, path: &str, body: &str) -> Self {
        Self::new(method, path, HeaderMap::new(), Bytes::from(body.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn decodes_json_body_ignoring_unknown_fields() {
        let req = Request::fake(Method::Post, "/users", r#"{"name":"ada","extra":true}"#);
        let named: Named = req.json().unwrap();
        assert_eq!(named.name, "ada");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        let req = Request::new(Method::Get, "/", headers, Bytes::new());
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.param("id"), None);
    }

    #[test]
    fn method_name_prefers_the_token_as_sent() {
        let known = Request::fake(Method::Delete, "/users/1", "");
        assert_eq!(known.method_name(), "DELETE");

        let unknown = Request::fake(Method::Get, "/users", "").with_unknown_method("PROPFIND");
        assert_eq!(unknown.method_name(), "PROPFIND");
        assert_eq!(unknown.method(), Method::Get);
    }
}
