//! Absorbs the backend's inconsistent envelope nesting.
//!
//! Depending on the endpoint, the same payload may arrive bare, as
//! `{data: ...}`, or as `{success, data: {success, data: ...}}`. Service
//! modules run every body through this module so callers always see one
//! flat shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::client::ApiResult;
use super::error::ApiError;

/// How many envelope layers the backend has been seen to nest.
pub const ENVELOPE_DEPTH: usize = 2;

/// Keys only an envelope carries next to `data`. Any one of them marks the
/// object as an envelope, whatever else sits beside it (`timestamp`,
/// `path` and the like). An object with `data` and none of these is a
/// domain object, unless `data` is its only key.
const ENVELOPE_MARKERS: &[&str] = &[
    "success",
    "status",
    "statusCode",
    "message",
    "error",
    "meta",
    "pagination",
    "total",
    "totalPages",
    "page",
    "limit",
];

fn is_envelope(object: &Map<String, Value>) -> bool {
    if !object.contains_key("data") {
        return false;
    }
    object.len() == 1 || ENVELOPE_MARKERS.iter().any(|key| object.contains_key(*key))
}

/// Removes up to `depth` envelope layers.
pub fn peel(value: Value, depth: usize) -> Value {
    peel_with(value, depth, |_| {})
}

fn peel_with(mut value: Value, depth: usize, mut visit: impl FnMut(&Map<String, Value>)) -> Value {
    for _ in 0..depth {
        match value {
            Value::Object(mut object) if is_envelope(&object) => {
                visit(&object);
                value = object.remove("data").unwrap_or(Value::Null);
            }
            other => return other,
        }
    }
    value
}

/// Peels the envelope and decodes what is left.
pub fn unwrap_data<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(peel(value, ENVELOPE_DEPTH)).map_err(|e| ApiError::invalid_response(e, None))
}

/// Pagination details, gathered from whichever envelope layer carried them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: Option<u64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total_pages: Option<u32>,
}

impl PageMeta {
    fn absorb(&mut self, object: &Map<String, Value>) {
        self.merge_from(object);
        for nested in ["meta", "pagination"] {
            if let Some(Value::Object(inner)) = object.get(nested) {
                self.merge_from(inner);
            }
        }
    }

    // Outer layers win; inner layers only fill gaps.
    fn merge_from(&mut self, object: &Map<String, Value>) {
        let number = |key: &str| object.get(key).and_then(Value::as_u64);
        let small = |key: &str| number(key).and_then(|n| u32::try_from(n).ok());

        self.total = self.total.or_else(|| number("total"));
        self.page = self.page.or_else(|| small("page"));
        self.limit = self.limit.or_else(|| small("limit"));
        self.total_pages = self.total_pages.or_else(|| small("totalPages"));
    }
}

/// A flat list result, whatever envelope the endpoint used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Peels the envelope down to an array and collects pagination metadata on
/// the way. A paginated object of the form `{items: [...], total, ...}` at
/// the bottom is accepted as well.
pub fn unwrap_page<T: DeserializeOwned>(value: Value) -> ApiResult<Page<T>> {
    let mut meta = PageMeta::default();
    let inner = peel_with(value, ENVELOPE_DEPTH, |object| meta.absorb(object));

    let items = match inner {
        Value::Array(items) => items,
        Value::Object(mut object) => {
            meta.absorb(&object);
            match object.remove("items") {
                Some(Value::Array(items)) => items,
                _ => return Err(ApiError::invalid_response("expected a list", None)),
            }
        }
        Value::Null => Vec::new(),
        _ => return Err(ApiError::invalid_response("expected a list", None)),
    };

    let items = serde_json::from_value(Value::Array(items))
        .map_err(|e| ApiError::invalid_response(e, None))?;

    Ok(Page { items, meta })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_single_and_double_envelopes_agree() {
        let single = json!({"data": [{"id": 1}, {"id": 2}]});
        let double = json!({"success": true, "data": {"success": true, "data": [{"id": 1}, {"id": 2}]}});

        let a: Page<Item> = unwrap_page(single).unwrap();
        let b: Page<Item> = unwrap_page(double).unwrap();

        assert_eq!(a.items, b.items);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_bare_array_passes_through() {
        let page: Page<Item> = unwrap_page(json!([{"id": 3}])).unwrap();
        assert_eq!(page.items, vec![Item { id: 3 }]);
    }

    #[test]
    fn test_meta_collected_from_any_layer() {
        let body = json!({
            "success": true,
            "data": {"data": [{"id": 1}], "meta": {"total": 41, "page": 2, "limit": 20, "totalPages": 3}}
        });

        let page: Page<Item> = unwrap_page(body).unwrap();
        assert_eq!(page.meta.total, Some(41));
        assert_eq!(page.meta.page, Some(2));
        assert_eq!(page.meta.total_pages, Some(3));
    }

    #[test]
    fn test_domain_object_with_data_field_is_not_peeled() {
        let body = json!({"id": 9, "data": "payload"});
        assert_eq!(peel(body.clone(), ENVELOPE_DEPTH), body);
    }

    #[test]
    fn test_unlisted_sibling_keys_do_not_block_peeling() {
        let body = json!({"success": true, "data": [{"id": 1}], "timestamp": "2024-01-01"});
        let page: Page<Item> = unwrap_page(body).unwrap();
        assert_eq!(page.items, vec![Item { id: 1 }]);

        let body = json!({
            "statusCode": 200,
            "path": "/reports/r1",
            "data": {"success": true, "data": {"id": 4}, "code": "OK"}
        });
        let item: Item = unwrap_data(body).unwrap();
        assert_eq!(item, Item { id: 4 });
    }

    #[test]
    fn test_flat_paging_keys_mark_an_envelope() {
        let body = json!({"data": [{"id": 1}, {"id": 2}], "total": 12, "page": 1, "limit": 2});
        let page: Page<Item> = unwrap_page(body).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.meta.total, Some(12));
    }

    #[test]
    fn test_peel_stops_at_depth() {
        let body = json!({"data": {"data": {"data": 1}}});
        assert_eq!(peel(body, 2), json!({"data": 1}));
    }

    #[test]
    fn test_non_list_is_rejected() {
        let result: ApiResult<Page<Item>> = unwrap_page(json!({"data": 5}));
        assert!(result.is_err());
    }
}
