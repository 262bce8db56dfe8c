//! Raw form input types
//!
//! The HTTP layer flattens a multipart request into these two shapes; the
//! pipeline never touches multipart mechanics itself.

use std::collections::HashMap;

/// Named text fields from one form post. Duplicate names keep the last
/// value seen, matching urlencoded semantics.
#[derive(Debug, Clone, Default)]
pub struct RawForm {
    fields: HashMap<String, String>,
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = RawForm::new();
        for (k, v) in iter {
            form.insert(k, v);
        }
        form
    }
}

/// One uploaded file as delivered by the multipart decoder. Ownership of
/// the item it belongs to is encoded in `field_name`; `data` is held only
/// until the storage call for this file settles.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field_name: String,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
