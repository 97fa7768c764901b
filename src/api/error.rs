use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// One entry of a validation failure: which field, and what is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub message: String,
    pub path: String,
}

/// The `message` member of the backend error envelope.
///
/// General failures carry a sentence; form validation failures carry one
/// entry per invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Fields(Vec<FieldError>),
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessage::Text(text) => write!(f, "{}", text),
            ErrorMessage::Fields(fields) => {
                let joined: Vec<String> = fields
                    .iter()
                    .map(|field| format!("{}: {}", field.path, field.message))
                    .collect();
                write!(f, "{}", joined.join(", "))
            }
        }
    }
}

impl From<&str> for ErrorMessage {
    fn from(text: &str) -> Self {
        ErrorMessage::Text(text.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(text: String) -> Self {
        ErrorMessage::Text(text)
    }
}

/// Every failed call surfaces as this one shape, whatever went wrong:
/// a 4xx/5xx with an error body, a response without a body, a network
/// failure, a timeout or a cancelled request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub message: ErrorMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ApiError {
    pub fn new(message: impl Into<ErrorMessage>, status_code: Option<u16>) -> Self {
        Self {
            message: message.into(),
            error: None,
            status_code,
        }
    }

    /// Synthesized error for failures that produced no usable response body.
    pub fn transport(error: &reqwest::Error) -> Self {
        Self::new(error.to_string(), error.status().map(|status| status.as_u16()))
    }

    /// Reads `timeout of <n>ms exceeded`.
    pub fn timeout(limit: std::time::Duration) -> Self {
        Self {
            message: ErrorMessage::Text(format!("timeout of {}ms exceeded", limit.as_millis())),
            error: Some("Timeout".to_string()),
            status_code: None,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            message: ErrorMessage::Text("Request cancelled".to_string()),
            error: Some("Cancelled".to_string()),
            status_code: None,
        }
    }

    /// Builds the error for a non-2xx response.
    ///
    /// A JSON object body keeps its `message`, `error` and `statusCode`
    /// members as sent; a missing `statusCode` comes from the HTTP status and
    /// a missing `message` falls back to `error`, then to the status reason.
    /// Any other body becomes `{message, statusCode}` with the raw text (or
    /// the status reason when the body is empty) as the message.
    pub fn from_response_body(status: reqwest::StatusCode, body: &str) -> Self {
        if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body) {
            return Self::from_error_object(status, object);
        }

        let message = if body.trim().is_empty() {
            status_reason(status)
        } else {
            body.to_string()
        };

        Self::new(message, Some(status.as_u16()))
    }

    fn from_error_object(status: reqwest::StatusCode, mut object: Map<String, Value>) -> Self {
        let error = object.get("error").and_then(Value::as_str).map(str::to_string);
        let status_code = object
            .get("statusCode")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok())
            .unwrap_or(status.as_u16());

        let message = match object.remove("message") {
            Some(Value::Null) | None => None,
            Some(value) => Some(
                serde_json::from_value::<ErrorMessage>(value.clone())
                    .unwrap_or_else(|_| ErrorMessage::Text(value.to_string())),
            ),
        };
        let message = message
            .or_else(|| error.clone().map(ErrorMessage::Text))
            .unwrap_or_else(|| ErrorMessage::Text(status_reason(status)));

        Self {
            message,
            error,
            status_code: Some(status_code),
        }
    }

    pub fn invalid_response(detail: impl fmt::Display, status_code: Option<u16>) -> Self {
        Self {
            message: ErrorMessage::Text(format!("Invalid response: {}", detail)),
            error: Some("InvalidResponse".to_string()),
            status_code,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == Some(401)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.message, ErrorMessage::Fields(_))
    }

    /// Flat `path -> message` map for highlighting form fields.
    pub fn field_errors(&self) -> HashMap<String, String> {
        field_errors(self)
    }
}

/// Returns one entry per invalid field when the error is a validation
/// failure, and an empty map for every other kind of failure.
pub fn field_errors(error: &ApiError) -> HashMap<String, String> {
    match &error.message {
        ErrorMessage::Fields(fields) => fields
            .iter()
            .map(|field| (field.path.clone(), field.message.clone()))
            .collect(),
        ErrorMessage::Text(_) => HashMap::new(),
    }
}

fn status_reason(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()))
}
