//! Radix-tree request router.
//!
//! One tree per HTTP method. A path that matches under a different method
//! answers `405` with an `Allow` header; anything else unmatched is `404`.
//!
//! A router carries a state value `S` that is handed to every handler taking
//! `(Request, S)`. Handlers taking only a `Request` work with any state.

use std::collections::HashMap;
use std::sync::Arc;

use http::header::{ALLOW, HeaderValue};
use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// The application router. Build it once at startup; pass it to
/// [`Server::serve`](crate::Server::serve).
pub struct Router<S = ()> {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    state: S,
}

pub(crate) enum Lookup {
    Found(BoxedHandler, HashMap<String, String>),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self::with_state(())
    }
}

impl<S: Clone + Send + Sync + 'static> Router<S> {
    pub fn with_state(state: S) -> Self {
        Self { routes: HashMap::new(), state }
    }

    /// Register a `GET` handler. Path parameters use `{name}` syntax.
    pub fn get<T>(self, path: &str, handler: impl Handler<T, S>) -> Self {
        self.on(Method::GET, path, handler)
    }

    /// Register a handler for a method + path pair.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route.
    /// Routes are fixed at startup, so this is a programming error.
    pub fn on<T>(mut self, method: Method, path: &str, handler: impl Handler<T, S>) -> Self {
        let handler = handler.bind(self.state.clone());
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }
}

impl<S> Router<S> {
    pub(crate) fn lookup(&self, method: &Method, path: &str) -> Lookup {
        if let Some(matched) = self.routes.get(method).and_then(|tree| tree.at(path).ok()) {
            let params = matched.params.iter()
                .map(|(k, v)| (k.to_owned(), decode(v)))
                .collect();
            return Lookup::Found(Arc::clone(matched.value), params);
        }

        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| m.clone())
            .collect();
        if allowed.is_empty() {
            return Lookup::NotFound;
        }
        allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Lookup::MethodNotAllowed(allowed)
    }

    /// Routes one request to its handler and returns the response.
    pub async fn dispatch(&self, method: &Method, path: &str) -> Response {
        match self.lookup(method, path) {
            Lookup::Found(handler, params) => {
                handler.call(Request::new(params)).await
            }
            Lookup::MethodNotAllowed(allowed) => {
                let allow = allowed.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
                let body = serde_json::json!({ "error": "method not allowed" }).to_string();
                let builder = Response::builder().status(StatusCode::METHOD_NOT_ALLOWED);
                match HeaderValue::from_str(&allow) {
                    Ok(value) => builder.header(ALLOW, value).json(body.into_bytes()),
                    Err(_)    => builder.json(body.into_bytes()),
                }
            }
            Lookup::NotFound => Response::error(StatusCode::NOT_FOUND, "not found"),
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// Percent-decodes a path segment; invalid UTF-8 keeps the raw segment.
fn decode(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map_or_else(|_| raw.to_owned(), |s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo_router() -> Router {
        Router::new()
            .get("/nbh/{nbh}", |req: Request| async move {
                req.param("nbh").unwrap_or_default().to_owned()
            })
            .on(Method::DELETE, "/nbh/{nbh}", |_req: Request| async { StatusCode::NO_CONTENT })
    }

    #[tokio::test]
    async fn params_are_percent_decoded() {
        let res = echo_router().dispatch(&Method::GET, "/nbh/Old%20Town").await;
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(res.body(), b"Old Town");
    }

    #[tokio::test]
    async fn invalid_utf8_keeps_raw_segment() {
        let res = echo_router().dispatch(&Method::GET, "/nbh/%FF").await;
        assert_eq!(res.body(), b"%FF");
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let res = echo_router().dispatch(&Method::GET, "/nowhere").await;
        assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(res.body(), br#"{"error":"not found"}"#);
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_allow() {
        let res = echo_router().dispatch(&Method::POST, "/nbh/X").await;
        assert_eq!(res.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.header("allow"), Some("DELETE, GET"));
    }

    #[tokio::test]
    async fn stateful_handlers_receive_the_router_state() {
        let router = Router::with_state(String::from("Old Town"))
            .get("/home", |_req: Request, home: String| async move { home })
            .get("/healthz", |_req: Request| async { "ok" });

        assert_eq!(router.dispatch(&Method::GET, "/home").await.body(), b"Old Town");
        assert_eq!(router.dispatch(&Method::GET, "/healthz").await.body(), b"ok");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = Router::new()
            .get("/nbh/{nbh}", |_req: Request| async { "a" })
            .get("/nbh/{nbh}", |_req: Request| async { "b" });
    }
}
