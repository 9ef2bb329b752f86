// src/types/common.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of a listing. Every service list call returns this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Listing shapes seen on the wire: a bare array, or an object with `items`
/// and optional paging fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PagedBody<T> {
    Bare(Vec<T>),
    Wrapped {
        items: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        page: Option<u32>,
        #[serde(default, alias = "page_size", rename = "pageSize")]
        page_size: Option<u32>,
    },
}

impl<T> PagedBody<T> {
    pub fn into_paged(self, page: u32, page_size: u32) -> Paged<T> {
        match self {
            PagedBody::Bare(items) => Paged {
                total: items.len() as u64,
                items,
                page,
                page_size,
            },
            PagedBody::Wrapped {
                items,
                total,
                page: served_page,
                page_size: served_size,
            } => Paged {
                total: total.unwrap_or(items.len() as u64),
                items,
                page: served_page.unwrap_or(page),
                page_size: served_size.unwrap_or(page_size),
            },
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            PagedBody::Bare(items) | PagedBody::Wrapped { items, .. } => items,
        }
    }
}

/// Query string for list calls: paging plus free-form filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(flatten)]
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(key.into(), value.to_string());
        self
    }

    pub fn requested_page(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn requested_page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// Accept identifiers sent either as strings or as numbers.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, got {}",
            other
        ))),
    }
}

/// Treat an explicit `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub type Extra = BTreeMap<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array_becomes_requested_page() {
        let body: PagedBody<Value> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        let paged = body.into_paged(2, 10);
        assert_eq!(paged.items.len(), 3);
        assert_eq!(paged.total, 3);
        assert_eq!(paged.page, 2);
        assert_eq!(paged.page_size, 10);
    }

    #[test]
    fn test_wrapped_page_keeps_served_values() {
        let body: PagedBody<Value> = serde_json::from_value(json!({
            "items": [{"id": 1}],
            "total": 41,
            "page": 3,
            "pageSize": 1
        }))
        .unwrap();
        let paged = body.into_paged(1, 20);
        assert_eq!(paged.total, 41);
        assert_eq!(paged.page, 3);
        assert_eq!(paged.page_size, 1);

        let items_only: PagedBody<Value> =
            serde_json::from_value(json!({"items": [1, 2]})).unwrap();
        assert_eq!(items_only.into_paged(1, 20).total, 2);
    }

    #[test]
    fn test_list_query_serialization() {
        let query = ListQuery::new().page(2, 50).filter("jobId", "j-1");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"page": 2, "pageSize": 50, "jobId": "j-1"})
        );
        assert_eq!(ListQuery::new().requested_page(), 1);
        assert_eq!(ListQuery::new().requested_page_size(), 20);
    }
}
