//! Health-check handlers.
//!
//! | Probe | Path | Answers |
//! |---|---|---|
//! | **Liveness** | `/healthz` | The process can respond to HTTP. |
//! | **Readiness** | `/readyz` | The document store answers a ping. |

use http::StatusCode;
use tracing::warn;

use crate::engine::QueryEngine;
use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"` while the store answers, `503` otherwise.
pub async fn readiness(_req: Request, engine: QueryEngine) -> Response {
    match engine.store().ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            Response::status(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
