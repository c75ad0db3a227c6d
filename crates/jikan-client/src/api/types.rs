//! Jikan API v4 response envelope.
//!
//! Every endpoint answers `{ "data": ... }`, where `data` is a list for
//! collection endpoints and an object for detail endpoints. The payload is
//! kept as raw JSON; callers pick the fields they render.

use super::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Missing `data` decodes as `null`
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl Envelope {
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        Ok(serde_json::from_value(value)?)
    }

    /// List elements of `data`, or an empty slice for object payloads
    pub fn items(&self) -> &[Value] {
        self.data.as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_next_page(&self) -> bool {
        self.pagination.as_ref().is_some_and(|p| p.has_next_page)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    pub current_page: Option<u32>,
    pub items: Option<PaginationItems>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_envelope() {
        let envelope = Envelope::from_value(json!({
            "data": [{ "mal_id": 1 }, { "mal_id": 5 }],
            "pagination": {
                "last_visible_page": 40,
                "has_next_page": true,
                "current_page": 1,
                "items": { "count": 2, "total": 80, "per_page": 2 }
            }
        }))
        .unwrap();

        assert_eq!(envelope.items().len(), 2);
        assert_eq!(envelope.items()[1]["mal_id"], 5);
        assert!(envelope.has_next_page());
        assert_eq!(envelope.pagination.unwrap().items.unwrap().total, 80);
    }

    #[test]
    fn test_object_envelope() {
        let envelope = Envelope::from_value(json!({
            "data": { "mal_id": 20, "title": "Naruto" }
        }))
        .unwrap();

        assert!(envelope.items().is_empty());
        assert_eq!(envelope.data["title"], "Naruto");
        assert!(!envelope.has_next_page());
    }

    #[test]
    fn test_missing_data_defaults_to_null() {
        let envelope = Envelope::from_value(json!({})).unwrap();
        assert!(envelope.data.is_null());
        assert!(envelope.pagination.is_none());
    }

    #[test]
    fn test_partial_pagination() {
        let envelope = Envelope::from_value(json!({
            "data": [],
            "pagination": { "has_next_page": false }
        }))
        .unwrap();
        assert_eq!(envelope.pagination, Some(Pagination::default()));
    }

    #[test]
    fn test_non_object_body_is_decode_error() {
        let err = Envelope::from_value(json!("not an envelope")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
