//! Query engine: turns request parameters into store queries.
//!
//! Two operations back the whole HTTP surface:
//!
//! - [`QueryEngine::list_features`]: a filtered find with a fixed projection.
//! - [`QueryEngine::summarize`]: the group/sort aggregation, optionally
//!   narrowed to one feature. Its result is a [`Summary`]: one row when a
//!   feature was named, every row otherwise.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::Error;
use crate::model::{FeatureView, SummaryRecord};
use crate::pipeline::{Filter, Pipeline};
use crate::store::FeatureStore;

/// Result of [`QueryEngine::summarize`].
///
/// Serialises untagged: `One` as an object (or `null`), `Many` as an array.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Summary {
    /// First group for a single feature, `None` when nothing matched.
    One(Option<SummaryRecord>),
    Many(Vec<SummaryRecord>),
}

#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn FeatureStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn FeatureStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn FeatureStore {
        self.store.as_ref()
    }

    /// Features in `nbh`, optionally restricted to one feature type.
    ///
    /// `nbh` is used verbatim, including the empty string.
    pub async fn list_features(
        &self,
        nbh: &str,
        feature: Option<&str>,
    ) -> Result<Vec<FeatureView>, Error> {
        let mut filter = Filter::nbh(nbh);
        if let Some(feature) = feature {
            filter = filter.and_feature(feature);
        }

        let views = self.store.find(filter).await?;
        debug!(nbh, feature, rows = views.len(), "listed features");
        Ok(views)
    }

    /// Counts per `(nbh, feature)`, sorted by feature then count descending.
    ///
    /// An empty `feature` is the same as none.
    pub async fn summarize(&self, feature: Option<&str>) -> Result<Summary, Error> {
        let feature = feature.filter(|f| !f.is_empty());
        let rows = self.store.aggregate(Pipeline::summary(feature)).await?;
        debug!(feature, rows = rows.len(), "summarized");

        Ok(match feature {
            Some(_) => Summary::One(rows.into_iter().next()),
            None    => Summary::Many(rows),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeatureRecord;
    use crate::store::InMemoryStore;

    fn engine() -> QueryEngine {
        let mut records = Vec::new();
        for i in 0..3 {
            records.push(FeatureRecord::new("X", "park", format!("X park {i}"), format!("{i} Oak Ave")));
        }
        records.push(FeatureRecord::new("X", "school", "X school", "9 Elm Rd"));
        for i in 0..2 {
            records.push(FeatureRecord::new("Y", "park", format!("Y park {i}"), format!("{i} Pine St")));
        }
        QueryEngine::new(Arc::new(InMemoryStore::with_records(records)))
    }

    #[tokio::test]
    async fn list_features_without_feature_returns_whole_nbh() {
        let views = engine().list_features("X", None).await.unwrap();
        assert_eq!(views.len(), 4);
    }

    #[tokio::test]
    async fn list_features_with_feature_is_a_subset() {
        let engine = engine();
        let all = engine.list_features("X", None).await.unwrap();
        let parks = engine.list_features("X", Some("park")).await.unwrap();

        assert_eq!(parks.len(), 3);
        assert!(parks.iter().all(|v| v.feature == "park" && all.contains(v)));
    }

    #[tokio::test]
    async fn list_features_for_unknown_or_empty_nbh_is_empty() {
        assert!(engine().list_features("Q", None).await.unwrap().is_empty());
        assert!(engine().list_features("", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn summarize_without_feature_is_many() {
        let Summary::Many(rows) = engine().summarize(None).await.unwrap() else {
            panic!("expected Summary::Many");
        };
        assert_eq!(
            rows,
            [
                SummaryRecord::new("X", "park", 3),
                SummaryRecord::new("Y", "park", 2),
                SummaryRecord::new("X", "school", 1),
            ]
        );
        assert_eq!(rows.iter().map(|r| r.count).sum::<u64>(), 6);
    }

    #[tokio::test]
    async fn empty_feature_is_treated_as_absent() {
        let engine = engine();
        assert_eq!(
            engine.summarize(Some("")).await.unwrap(),
            engine.summarize(None).await.unwrap()
        );
    }

    #[tokio::test]
    async fn summarize_feature_in_two_nbhs_returns_top_group() {
        // park lives in X (3) and Y (2); only the first sorted group survives.
        let summary = engine().summarize(Some("park")).await.unwrap();
        assert_eq!(summary, Summary::One(Some(SummaryRecord::new("X", "park", 3))));
    }

    #[tokio::test]
    async fn summarize_single_nbh_feature_counts_every_document() {
        let summary = engine().summarize(Some("school")).await.unwrap();
        assert_eq!(summary, Summary::One(Some(SummaryRecord::new("X", "school", 1))));
    }

    #[tokio::test]
    async fn summarize_missing_feature_is_none() {
        assert_eq!(engine().summarize(Some("pool")).await.unwrap(), Summary::One(None));
    }

    #[test]
    fn summary_serialises_by_shape() {
        let one = Summary::One(Some(SummaryRecord::new("X", "park", 3)));
        assert!(serde_json::to_value(&one).unwrap().is_object());
        assert!(serde_json::to_value(Summary::One(None)).unwrap().is_null());
        assert!(serde_json::to_value(Summary::Many(Vec::new())).unwrap().is_array());
    }
}
