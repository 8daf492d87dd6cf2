//! Records read from, and derived from, the `nbhs` collection.
//!
//! Field names on the wire follow the stored documents: `featureName` is
//! camel-cased, everything else is a single lowercase word.

use serde::{Deserialize, Serialize};

/// One stored document. Read-only from this service's point of view.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    pub feature: String,
    pub feature_name: String,
    pub address: String,
    pub nbh: String,
}

impl FeatureRecord {
    pub fn new(
        nbh: impl Into<String>,
        feature: impl Into<String>,
        feature_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            feature: feature.into(),
            feature_name: feature_name.into(),
            address: address.into(),
            nbh: nbh.into(),
        }
    }

    /// Projection onto the fields returned by `/nbh` lookups.
    pub fn view(&self) -> FeatureView {
        FeatureView {
            feature: self.feature.clone(),
            feature_name: self.feature_name.clone(),
            address: self.address.clone(),
        }
    }
}

/// Grouping key of a summary row.
///
/// `$group` omits a key whose source field is missing, so absent fields
/// decode as `""`.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(default)]
pub struct NbhInfo {
    pub nbh: String,
    pub feature: String,
}

/// How many records share one `(nbh, feature)` pair.
///
/// Serialised as `{"nbh": {"nbh": .., "feature": ..}, "count": n}`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SummaryRecord {
    #[serde(rename = "nbh")]
    pub key: NbhInfo,
    pub count: u64,
}

impl SummaryRecord {
    pub fn new(nbh: impl Into<String>, feature: impl Into<String>, count: u64) -> Self {
        Self {
            key: NbhInfo { nbh: nbh.into(), feature: feature.into() },
            count,
        }
    }

    /// Placeholder for a requested feature with no stored records.
    pub fn zero(feature: impl Into<String>) -> Self {
        Self::new(String::new(), feature, 0)
    }
}

/// A [`FeatureRecord`] without its `nbh`, which the caller already knows.
///
/// Stored documents are not validated; a missing field reads as `""`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureView {
    pub feature: String,
    pub feature_name: String,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_record_uses_nbh_as_key_field() {
        let json = serde_json::to_string(&SummaryRecord::new("X", "park", 3)).unwrap();
        assert_eq!(json, r#"{"nbh":{"nbh":"X","feature":"park"},"count":3}"#);
    }

    #[test]
    fn view_drops_nbh_and_keeps_camel_case() {
        let record = FeatureRecord::new("X", "park", "Jubilee Park", "1 Main St");
        let json = serde_json::to_string(&record.view()).unwrap();
        assert_eq!(
            json,
            r#"{"feature":"park","featureName":"Jubilee Park","address":"1 Main St"}"#
        );
    }

    #[test]
    fn stored_documents_deserialise_with_extra_fields() {
        let record: FeatureRecord = serde_json::from_str(
            r#"{"_id":"abc","nbh":"Y","feature":"school","featureName":"Elm","address":"2 Elm Rd"}"#,
        )
        .unwrap();
        assert_eq!(record, FeatureRecord::new("Y", "school", "Elm", "2 Elm Rd"));
    }

    #[test]
    fn sparse_views_fill_missing_fields_with_empty_strings() {
        let view: FeatureView = serde_json::from_str(r#"{"feature":"park"}"#).unwrap();
        assert_eq!(view, FeatureView { feature: "park".into(), ..FeatureView::default() });
    }
}
