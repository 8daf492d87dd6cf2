//! MongoDB-backed store.
//!
//! The driver's `Client` owns a connection pool and is safe to share across
//! tasks, so one `MongoStore` serves every request.

use futures::TryStreamExt;
use mongodb::bson::{self, Document, doc};
use mongodb::{Client, Collection};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Error;
use crate::model::{FeatureView, NbhInfo, SummaryRecord};
use crate::pipeline::{Filter, Pipeline, Stage};
use crate::settings::Settings;
use crate::store::traits::{FeatureStore, StoreFuture};

pub struct MongoStore {
    client: Client,
    database: String,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connects to the configured deployment and pings it once.
    ///
    /// An unreachable store fails here, before the server binds.
    pub async fn connect(settings: &Settings) -> Result<Self, Error> {
        let client = Client::with_uri_str(settings.mongodb_uri()).await?;
        let store = Self {
            collection: client
                .database(&settings.mongodb_database)
                .collection(&settings.mongodb_collection),
            database: settings.mongodb_database.clone(),
            client,
        };
        store.ping().await?;

        info!(
            database = %settings.mongodb_database,
            collection = %settings.mongodb_collection,
            "connected to mongodb"
        );
        Ok(store)
    }
}

/// Shape of a `$group` output row.
#[derive(Deserialize)]
struct GroupRow {
    #[serde(rename = "_id")]
    id: NbhInfo,
    count: u64,
}

impl From<GroupRow> for SummaryRecord {
    fn from(row: GroupRow) -> Self {
        Self { key: row.id, count: row.count }
    }
}

pub(crate) fn filter_doc(filter: &Filter) -> Document {
    let mut doc = Document::new();
    if let Some(nbh) = &filter.nbh {
        doc.insert("nbh", nbh.as_str());
    }
    if let Some(feature) = &filter.feature {
        doc.insert("feature", feature.as_str());
    }
    doc
}

pub(crate) fn view_projection() -> Document {
    doc! { "_id": 0, "feature": 1, "featureName": 1, "address": 1 }
}

pub(crate) fn pipeline_docs(pipeline: &Pipeline) -> Vec<Document> {
    pipeline.stages().iter()
        .map(|stage| match stage {
            Stage::Match(filter) => doc! { "$match": filter_doc(filter) },
            Stage::GroupByNbhFeature => doc! {
                "$group": {
                    "_id": { "nbh": "$nbh", "feature": "$feature" },
                    "count": { "$sum": 1 },
                }
            },
            Stage::SortByFeatureThenCount => doc! {
                "$sort": { "_id.feature": 1, "count": -1, "_id.nbh": 1 }
            },
            Stage::Limit(n) => doc! { "$limit": i64::try_from(*n).unwrap_or(i64::MAX) },
        })
        .collect()
}

impl FeatureStore for MongoStore {
    fn find(&self, filter: Filter) -> StoreFuture<'_, Vec<FeatureView>> {
        Box::pin(async move {
            let cursor = self.collection
                .find(filter_doc(&filter))
                .projection(view_projection())
                .await?;
            let docs: Vec<Document> = cursor.try_collect().await?;
            debug!(rows = docs.len(), "find completed");

            docs.into_iter()
                .map(|d| bson::from_document::<FeatureView>(d).map_err(Error::from))
                .collect()
        })
    }

    fn aggregate(&self, pipeline: Pipeline) -> StoreFuture<'_, Vec<SummaryRecord>> {
        Box::pin(async move {
            let cursor = self.collection.aggregate(pipeline_docs(&pipeline)).await?;
            let docs: Vec<Document> = cursor.try_collect().await?;
            debug!(rows = docs.len(), stages = pipeline.stages().len(), "aggregate completed");

            docs.into_iter()
                .map(|d| {
                    bson::from_document::<GroupRow>(d)
                        .map(SummaryRecord::from)
                        .map_err(Error::from)
                })
                .collect()
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.client.database(&self.database).run_command(doc! { "ping": 1 }).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_renders_only_present_fields() {
        assert_eq!(filter_doc(&Filter::nbh("X")), doc! { "nbh": "X" });
        assert_eq!(
            filter_doc(&Filter::nbh("X").and_feature("park")),
            doc! { "nbh": "X", "feature": "park" }
        );
        assert_eq!(filter_doc(&Filter::default()), Document::new());
    }

    #[test]
    fn full_summary_renders_group_then_sort() {
        let docs = pipeline_docs(&Pipeline::summary(None));
        assert_eq!(docs.len(), 2);
        assert_eq!(
            docs[0],
            doc! {
                "$group": {
                    "_id": { "nbh": "$nbh", "feature": "$feature" },
                    "count": { "$sum": 1 },
                }
            }
        );
        let sort = docs[1].get_document("$sort").unwrap();
        let keys: Vec<_> = sort.keys().map(String::as_str).collect();
        assert_eq!(keys, ["_id.feature", "count", "_id.nbh"]);
        assert_eq!(sort.get_i32("count").unwrap(), -1);
    }

    #[test]
    fn feature_summary_starts_with_match_and_ends_with_limit() {
        let docs = pipeline_docs(&Pipeline::summary(Some("school")));
        assert_eq!(docs.first(), Some(&doc! { "$match": { "feature": "school" } }));
        assert_eq!(docs.last(), Some(&doc! { "$limit": 1_i64 }));
    }

    #[test]
    fn group_rows_decode_from_int32_counts() {
        let row = doc! { "_id": { "nbh": "X", "feature": "park" }, "count": 3_i32 };
        let record: SummaryRecord = bson::from_document::<GroupRow>(row).unwrap().into();
        assert_eq!(record, SummaryRecord::new("X", "park", 3));
    }

    #[test]
    fn documents_with_missing_fields_still_decode() {
        let view: FeatureView =
            bson::from_document(doc! { "feature": "park", "featureName": "P" }).unwrap();
        assert_eq!(view.address, "");
        assert_eq!(view.feature_name, "P");

        // No `nbh` on the source documents: `$group` leaves it out of `_id`.
        let row = doc! { "_id": { "feature": "park" }, "count": 1_i32 };
        let record: SummaryRecord = bson::from_document::<GroupRow>(row).unwrap().into();
        assert_eq!(record, SummaryRecord::new("", "park", 1));
    }

    #[test]
    fn projection_excludes_id_and_nbh() {
        let projection = view_projection();
        assert_eq!(projection.get_i32("_id").unwrap(), 0);
        assert!(!projection.contains_key("nbh"));
    }
}
