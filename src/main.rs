//! nbhood server binary.
//!
//! Run with:
//!   MONGODB_HOST=localhost RUST_LOG=info cargo run
//!
//! Try:
//!   curl http://localhost:9999/summary
//!   curl http://localhost:9999/summary/park,school
//!   curl http://localhost:9999/nbh/Downtown/park

use std::sync::Arc;

use nbhood::{Error, MongoStore, QueryEngine, Server, Settings, api};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;
    let addr = settings.socket_addr()?;

    // Unreachable store: abort before binding.
    let store = match MongoStore::connect(&settings).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "cannot reach mongodb");
            return Err(e);
        }
    };

    let engine = QueryEngine::new(Arc::new(store));
    Server::bind(addr).serve(api::routes(engine)).await
}
