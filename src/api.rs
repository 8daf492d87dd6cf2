//! The HTTP surface: routes, handlers, and response shaping.
//!
//! | Path | Body |
//! |---|---|
//! | `/summary` | every `(nbh, feature)` count, feature ↑ then count ↓ |
//! | `/summary/{sort}` | one row per comma-separated feature, in listed order |
//! | `/nbh/{nbh}` | all features of a neighbourhood |
//! | `/nbh/{nbh}/{feature}` | one feature type within a neighbourhood |
//! | `/healthz`, `/readyz` | liveness / readiness probes |
//!
//! Data responses are always JSON arrays.

use tracing::debug;

use crate::engine::{QueryEngine, Summary};
use crate::error::Error;
use crate::health;
use crate::model::{FeatureView, SummaryRecord};
use crate::request::Request;
use crate::response::Json;
use crate::router::Router;

pub fn routes(engine: QueryEngine) -> Router<QueryEngine> {
    Router::with_state(engine)
        .get("/summary",              find_summaries)
        .get("/summary/{sort}",       find_summaries)
        .get("/nbh/{nbh}",            find_nbh)
        .get("/nbh/{nbh}/{feature}",  find_nbh)
        .get("/healthz",              health::liveness)
        .get("/readyz",               health::readiness)
}

// GET /summary, GET /summary/{sort}
async fn find_summaries(
    req: Request,
    engine: QueryEngine,
) -> Result<Json<Vec<SummaryRecord>>, Error> {
    build_summary(&engine, req.param("sort")).await.map(Json)
}

// GET /nbh/{nbh}, GET /nbh/{nbh}/{feature}
async fn find_nbh(req: Request, engine: QueryEngine) -> Result<Json<Vec<FeatureView>>, Error> {
    let nbh = req.param("nbh").unwrap_or_default();
    build_nbh(&engine, nbh, req.param("feature")).await.map(Json)
}

/// Rows for the summary endpoint.
///
/// Without `sort` (or with an empty one) this is the full aggregation. With a
/// comma-separated list it runs one single-feature summary per non-empty
/// name, in listed order; a name with no records yields a zero-count row so
/// the output always has one entry per name.
pub async fn build_summary(
    engine: &QueryEngine,
    sort: Option<&str>,
) -> Result<Vec<SummaryRecord>, Error> {
    let Some(sort) = sort.filter(|s| !s.is_empty()) else {
        return Ok(rows(engine.summarize(None).await?));
    };

    let mut out = Vec::new();
    for feature in sort.split(',').filter(|f| !f.is_empty()) {
        let row = rows(engine.summarize(Some(feature)).await?)
            .into_iter()
            .next()
            .unwrap_or_else(|| SummaryRecord::zero(feature));
        out.push(row);
    }
    debug!(sort, rows = out.len(), "built per-feature summary");
    Ok(out)
}

/// Rows for the neighbourhood endpoint.
pub async fn build_nbh(
    engine: &QueryEngine,
    nbh: &str,
    feature: Option<&str>,
) -> Result<Vec<FeatureView>, Error> {
    engine.list_features(nbh, feature).await
}

fn rows(summary: Summary) -> Vec<SummaryRecord> {
    match summary {
        Summary::One(row)  => row.into_iter().collect(),
        Summary::Many(all) => all,
    }
}
