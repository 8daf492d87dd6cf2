//! Typed queries against the feature collection.
//!
//! A [`Filter`] is an equality predicate over the two indexed fields. A
//! [`Pipeline`] is an ordered list of aggregation [`Stage`]s. Stores decide
//! how to execute them: [`MongoStore`](crate::store::MongoStore) renders BSON,
//! [`InMemoryStore`](crate::store::InMemoryStore) evaluates them directly.
//!
//! ```text
//! match { feature } ──► group { nbh, feature } → count ──► sort feature ↑ count ↓ ──► limit
//!   (optional)                                                                     (optional)
//! ```

use crate::model::FeatureRecord;

/// Equality predicate. `None` fields do not constrain the match.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    pub nbh: Option<String>,
    pub feature: Option<String>,
}

impl Filter {
    pub fn nbh(nbh: impl Into<String>) -> Self {
        Self { nbh: Some(nbh.into()), feature: None }
    }

    pub fn feature(feature: impl Into<String>) -> Self {
        Self { nbh: None, feature: Some(feature.into()) }
    }

    pub fn and_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    pub fn matches(&self, record: &FeatureRecord) -> bool {
        self.nbh.as_deref().is_none_or(|n| n == record.nbh)
            && self.feature.as_deref().is_none_or(|f| f == record.feature)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    Match(Filter),
    /// Bucket by `{nbh, feature}`, counting documents per bucket.
    GroupByNbhFeature,
    /// `feature` ascending, then `count` descending, then `nbh` ascending.
    SortByFeatureThenCount,
    Limit(usize),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The summary pipeline for an optional feature filter.
    ///
    /// With a feature the pipeline is cut to the first row, matching the
    /// single-object `/summary/{feature}` contract.
    pub fn summary(feature: Option<&str>) -> Self {
        let mut pipeline = Self::new();
        if let Some(feature) = feature {
            pipeline = pipeline.stage(Stage::Match(Filter::feature(feature)));
        }
        pipeline = pipeline
            .stage(Stage::GroupByNbhFeature)
            .stage(Stage::SortByFeatureThenCount);
        if feature.is_some() {
            pipeline = pipeline.stage(Stage::Limit(1));
        }
        pipeline
    }
}
