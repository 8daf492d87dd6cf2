//! Per-request tracing.
//!
//! Every request runs inside a `request` span carrying method and path, and
//! ends with one event holding status and latency. The event level follows
//! the status class: 5xx → `error`, 4xx → `warn`, the rest → `info`.

use std::time::Instant;

use http::Method;
use tracing::{Instrument, error, info, info_span, warn};

use crate::response::Response;
use crate::router::Router;

pub(crate) async fn trace<S>(router: &Router<S>, method: &Method, path: &str) -> Response {
    let span = info_span!("request", method = %method, path = %path);

    async move {
        let started = Instant::now();
        let response = router.dispatch(method, path).await;
        let status = response.status_code().as_u16();
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        if response.status_code().is_server_error() {
            error!(status, latency_ms, "request completed");
        } else if response.status_code().is_client_error() {
            warn!(status, latency_ms, "request completed");
        } else {
            info!(status, latency_ms, "request completed");
        }
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use http::StatusCode;

    #[tokio::test]
    async fn passes_the_response_through() {
        let router = Router::new().get("/readyz", |_req: Request| async { "ready" });

        let ok = trace(&router, &Method::GET, "/readyz").await;
        assert_eq!(ok.status_code(), StatusCode::OK);
        assert_eq!(ok.body(), b"ready");

        let missing = trace(&router, &Method::GET, "/nope").await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }
}
