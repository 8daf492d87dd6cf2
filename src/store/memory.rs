//! In-memory store.
//!
//! Keeps records in a `Vec` in insertion order, which plays the part of the
//! collection's natural scan order. Pipelines are evaluated stage by stage
//! with the same semantics the MongoDB rendering has, so tests against this
//! store describe what production returns.

use std::collections::HashMap;

use crate::model::{FeatureRecord, FeatureView, NbhInfo, SummaryRecord};
use crate::pipeline::{Filter, Pipeline, Stage};
use crate::store::traits::{FeatureStore, StoreFuture};

#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    records: Vec<FeatureRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn with_records(records: Vec<FeatureRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn select(&self, filter: &Filter) -> Vec<FeatureView> {
        self.records.iter()
            .filter(|r| filter.matches(r))
            .map(FeatureRecord::view)
            .collect()
    }

    fn run(&self, pipeline: &Pipeline) -> Vec<SummaryRecord> {
        let mut docs: Vec<&FeatureRecord> = self.records.iter().collect();
        let mut rows: Vec<SummaryRecord> = Vec::new();

        for stage in pipeline.stages() {
            match stage {
                Stage::Match(filter) => docs.retain(|r| filter.matches(r)),
                Stage::GroupByNbhFeature => rows = group(&docs),
                Stage::SortByFeatureThenCount => rows.sort_by(|a, b| {
                    a.key.feature.cmp(&b.key.feature)
                        .then(b.count.cmp(&a.count))
                        .then(a.key.nbh.cmp(&b.key.nbh))
                }),
                Stage::Limit(n) => rows.truncate(*n),
            }
        }
        rows
    }
}

impl FromIterator<FeatureRecord> for InMemoryStore {
    fn from_iter<I: IntoIterator<Item = FeatureRecord>>(iter: I) -> Self {
        Self::with_records(iter.into_iter().collect())
    }
}

/// Buckets by `{nbh, feature}` in first-seen order.
fn group(docs: &[&FeatureRecord]) -> Vec<SummaryRecord> {
    let mut index: HashMap<NbhInfo, usize> = HashMap::new();
    let mut rows: Vec<SummaryRecord> = Vec::new();

    for doc in docs {
        let key = NbhInfo { nbh: doc.nbh.clone(), feature: doc.feature.clone() };
        let next = rows.len();
        let i = *index.entry(key.clone()).or_insert(next);
        if i == next {
            rows.push(SummaryRecord { key, count: 0 });
        }
        rows[i].count += 1;
    }
    rows
}

impl FeatureStore for InMemoryStore {
    fn find(&self, filter: Filter) -> StoreFuture<'_, Vec<FeatureView>> {
        Box::pin(async move { Ok(self.select(&filter)) })
    }

    fn aggregate(&self, pipeline: Pipeline) -> StoreFuture<'_, Vec<SummaryRecord>> {
        Box::pin(async move { Ok(self.run(&pipeline)) })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}
