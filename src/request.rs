//! Incoming HTTP request type.

use std::collections::HashMap;

/// A routed request: the decoded path parameters.
///
/// Bodies are never read; every route is a `GET`. Method and path are
/// recorded on the request span by the trace middleware.
pub struct Request {
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    /// Returns a named path parameter, percent-decoded.
    ///
    /// For a route `/nbh/{nbh}`, `req.param("nbh")` on `/nbh/Old%20Town`
    /// returns `Some("Old Town")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
