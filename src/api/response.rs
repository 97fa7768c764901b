use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use super::client::ApiResult;
use super::error::ApiError;

/// Successful call: the decoded body plus the transport details callers
/// occasionally need.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: u16,
    pub headers: HashMap<String, String>,
    /// The body's own top-level `message`, when it has one.
    pub message: Option<String>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decodes a 2xx body. An empty body decodes as JSON `null`, so endpoints
    /// answering `204 No Content` work with `T = ()` or `T = Option<_>`.
    /// A body that is not JSON at all is kept as a JSON string.
    pub(crate) fn decode(status: u16, headers: &HeaderMap, body: &[u8]) -> ApiResult<Self> {
        let value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
        };

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        let data = serde_json::from_value(value)
            .map_err(|e| ApiError::invalid_response(e, Some(status)))?;

        Ok(Self {
            data,
            status,
            headers: flatten_headers(headers),
            message,
        })
    }
}

fn flatten_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_TYPE};
    use serde_json::json;

    #[test]
    fn test_message_is_lifted_and_body_untouched() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let body = json!({"data": {"id": 7, "tags": ["a"]}, "message": "ok"});

        let response: ApiResponse<Value> =
            ApiResponse::decode(200, &headers, body.to_string().as_bytes()).unwrap();

        assert_eq!(response.data, body);
        assert_eq!(response.message.as_deref(), Some("ok"));
        assert_eq!(response.status, 200);
        assert_eq!(
            response.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_empty_body_decodes_as_unit() {
        let response: ApiResponse<()> = ApiResponse::decode(204, &HeaderMap::new(), b"").unwrap();
        assert_eq!(response.status, 204);
        assert_eq!(response.message, None);
    }

    #[test]
    fn test_plain_text_body_is_kept_as_string() {
        let response: ApiResponse<Value> =
            ApiResponse::decode(200, &HeaderMap::new(), b"Deleted successfully").unwrap();
        assert_eq!(response.data, Value::String("Deleted successfully".into()));
        assert_eq!(response.message, None);

        let response: ApiResponse<String> =
            ApiResponse::decode(201, &HeaderMap::new(), b"created").unwrap();
        assert_eq!(response.data, "created");
    }

    #[test]
    fn test_shape_mismatch_is_invalid_response() {
        let error = ApiResponse::<Vec<u32>>::decode(200, &HeaderMap::new(), br#"{"data":1}"#)
            .unwrap_err();
        assert_eq!(error.status_code, Some(200));
        assert_eq!(error.error.as_deref(), Some("InvalidResponse"));
    }
}
