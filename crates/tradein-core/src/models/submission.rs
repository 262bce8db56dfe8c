use serde::{Deserialize, Serialize};

/// Customer contact fields from the sell-to-us form.
///
/// Every attribute is optional on the wire; absent or non-string values
/// normalize to a trimmed empty string during parsing so downstream code
/// never deals with missing keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarFields {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub customer_instagram: String,
    pub customer_location: String,
    pub dropoff_method: String,
    /// Normalized to a list: a bare string becomes a single-element list,
    /// a JSON-encoded array is decoded, unparseable JSON becomes empty.
    pub payment_methods: Vec<String>,
}

impl ScalarFields {
    /// True when every field is empty. Used by the structural gate:
    /// a submission with no customer data and no items is rejected.
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_empty()
            && self.customer_phone.is_empty()
            && self.customer_email.is_empty()
            && self.customer_instagram.is_empty()
            && self.customer_location.is_empty()
            && self.dropoff_method.is_empty()
            && self.payment_methods.is_empty()
    }
}

/// A photo associated with an item, after the storage call settled.
///
/// `resolved_url` is `None` when the upload failed or timed out; the slot
/// is kept as a tombstone so per-item photo counts and ordering survive
/// partial storage outages. Byte content is never retained here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub original_filename: String,
    pub content_type: String,
    pub resolved_url: Option<String>,
}

impl PhotoRef {
    pub fn is_tombstone(&self) -> bool {
        self.resolved_url.is_none()
    }
}

/// One item offered for sale, identified by the submitter-assigned index.
///
/// Indices are unique within a submission but not necessarily contiguous;
/// an index referenced only by a photo still yields a record with empty
/// text attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub index: u32,
    pub brand_model: String,
    pub size: String,
    pub condition: String,
    pub desired_price: String,
    pub has_box: String,
    pub notes: String,
    /// Photos in arrival order, resolved or tombstoned.
    pub photos: Vec<PhotoRef>,
}

impl ItemRecord {
    /// A record materialized for an index that only photos referenced.
    pub fn empty_at(index: u32) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }
}

/// The root aggregate: one fully parsed form post.
///
/// Items are always in ascending index order. Create-once, render-once,
/// discard: nothing mutates a submission after the builder returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub customer: ScalarFields,
    pub items: Vec<ItemRecord>,
}

impl Submission {
    pub fn photo_count(&self) -> usize {
        self.items.iter().map(|i| i.photos.len()).sum()
    }
}

/// Non-fatal conditions accumulated while handling a submission.
///
/// These never abort the pipeline; they ride along with an accepted
/// outcome so the caller can surface what partially failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    #[error("field '{field}' contained malformed JSON: {detail}")]
    MalformedField { field: String, detail: String },

    #[error("file '{filename}' in field '{field_name}' matched no item")]
    UnassociatedFile {
        field_name: String,
        filename: String,
    },

    #[error("photo '{filename}' for item {item_index} failed to store: {detail}")]
    PhotoStorageFailed {
        item_index: u32,
        filename: String,
        detail: String,
    },

    #[error("could not send {recipient} notification: {detail}")]
    TransportFailed { recipient: String, detail: String },
}

/// Successful pipeline outcome: the submission plus everything that
/// partially failed along the way.
#[derive(Debug, Clone, Serialize)]
pub struct Accepted {
    pub submission: Submission,
    pub warnings: Vec<Warning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_fields_default_is_empty() {
        assert!(ScalarFields::default().is_empty());
    }

    #[test]
    fn scalar_fields_with_payment_methods_is_not_empty() {
        let fields = ScalarFields {
            payment_methods: vec!["cash".to_string()],
            ..Default::default()
        };
        assert!(!fields.is_empty());
    }

    #[test]
    fn tombstone_photo_has_no_url() {
        let photo = PhotoRef {
            original_filename: "left.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            resolved_url: None,
        };
        assert!(photo.is_tombstone());
    }

    #[test]
    fn warning_serializes_with_kind_tag() {
        let warning = Warning::UnassociatedFile {
            field_name: "photos".to_string(),
            filename: "pair.jpg".to_string(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "unassociated_file");
        assert_eq!(json["filename"], "pair.jpg");
    }
}
