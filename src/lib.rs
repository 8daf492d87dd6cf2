//! # nbhood
//!
//! A read-only HTTP query service over a MongoDB collection of neighbourhood
//! features. Each stored document is `{nbh, feature, featureName, address}`.
//!
//! Two resources:
//!
//! - **`/summary[/{sort}]`**: counts grouped by `(nbh, feature)`, produced
//!   by a `match → group → sort` aggregation.
//! - **`/nbh/{nbh}[/{feature}]`**: the features of one neighbourhood,
//!   projected to `{feature, featureName, address}`.
//!
//! ## Layout
//!
//! - [`QueryEngine`]: builds [`Pipeline`]s and filters, runs them against
//!   an injected [`FeatureStore`].
//! - [`api`]: routes and response shaping.
//! - [`Router`] / [`Server`]: radix-tree routing via [`matchit`], served by
//!   hyper on tokio with graceful shutdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use nbhood::{MongoStore, QueryEngine, Server, Settings, api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nbhood::Error> {
//!     let settings = Settings::from_env()?;
//!     let store = MongoStore::connect(&settings).await?;
//!     let engine = QueryEngine::new(Arc::new(store));
//!
//!     Server::bind(settings.socket_addr()?).serve(api::routes(engine)).await
//! }
//! ```

mod engine;
mod error;
mod handler;
mod middleware;
mod model;
mod pipeline;
mod request;
mod response;
mod router;
mod server;
mod settings;

pub mod api;
pub mod health;
pub mod store;

pub use engine::{QueryEngine, Summary};
pub use error::Error;
pub use handler::Handler;
pub use model::{FeatureRecord, FeatureView, NbhInfo, SummaryRecord};
pub use pipeline::{Filter, Pipeline, Stage};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use settings::Settings;
pub use store::{FeatureStore, InMemoryStore, MongoStore, StoreFuture};
