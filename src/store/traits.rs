//! The seam between the query engine and whatever holds the documents.
//!
//! The engine is handed an `Arc<dyn FeatureStore>` at construction. Methods
//! return boxed futures so the trait stays object-safe and every future is
//! `Send`, which the per-connection tokio tasks require.

use std::future::Future;
use std::pin::Pin;

use crate::error::Error;
use crate::model::{FeatureView, SummaryRecord};
use crate::pipeline::{Filter, Pipeline};

/// A heap-allocated store operation borrowing the store for `'a`.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send + 'a>>;

/// A read-only, concurrently usable view of the feature collection.
pub trait FeatureStore: Send + Sync + 'static {
    /// All records matching `filter`, projected to [`FeatureView`], in the
    /// store's natural scan order. No match is an empty list.
    fn find(&self, filter: Filter) -> StoreFuture<'_, Vec<FeatureView>>;

    /// Runs an aggregation pipeline that ends in grouped rows.
    fn aggregate(&self, pipeline: Pipeline) -> StoreFuture<'_, Vec<SummaryRecord>>;

    /// Round-trip to the backend. Used for readiness.
    fn ping(&self) -> StoreFuture<'_, ()>;
}
