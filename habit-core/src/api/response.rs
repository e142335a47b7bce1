//! Response Handling
//!
//! Turns a raw HTTP response into an [`ApiResponse`] or an [`ApiError`]
//! carrying the request context and the best available server message.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;

/// Successful response body
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// 204 No Content
    Empty,
    Json(Value),
    Text(String),
}

impl ApiResponse {
    /// Body as JSON; text bodies are parsed, empty bodies read as `null`.
    pub fn into_value(self) -> Value {
        match self {
            ApiResponse::Empty => Value::Null,
            ApiResponse::Json(value) => value,
            ApiResponse::Text(text) => {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            }
        }
    }

    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        Ok(serde_json::from_value(self.into_value())?)
    }

    /// Human-readable confirmation text from a mutation endpoint
    pub fn into_message(self) -> String {
        match self {
            ApiResponse::Empty => String::new(),
            ApiResponse::Text(text) => text,
            ApiResponse::Json(Value::String(text)) => text,
            ApiResponse::Json(value) => value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
        }
    }
}

/// Extract the error message from an error body
fn error_message(content_type: &str, body: Option<&str>) -> Option<String> {
    let body = body.map(str::trim).filter(|b| !b.is_empty())?;
    if content_type.contains("application/json") {
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            let field = ["message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str));
            if let Some(message) = field {
                return Some(message.to_string());
            }
        }
    }
    Some(body.to_string())
}

pub async fn handle_response(
    response: Response,
    method: &str,
    url: &str,
) -> Result<ApiResponse, ApiError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    tracing::debug!(%method, %url, status = status.as_u16(), %content_type, "api response");

    if !status.is_success() {
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.text().await.ok();
        let message = error_message(&content_type, body.as_deref())
            .unwrap_or_else(|| status_text.clone());

        tracing::error!(
            %method,
            %url,
            status = status.as_u16(),
            %message,
            "api request failed"
        );

        return Err(ApiError::Http {
            status: status.as_u16(),
            status_text,
            method: method.to_string(),
            url: url.to_string(),
            message,
            body,
        });
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(ApiResponse::Empty);
    }

    let text = response.text().await?;
    if content_type.contains("application/json") {
        match serde_json::from_str(&text) {
            Ok(value) => Ok(ApiResponse::Json(value)),
            Err(e) => {
                tracing::warn!(%url, error = %e, "JSON response did not parse, using text");
                Ok(ApiResponse::Text(text))
            }
        }
    } else {
        Ok(ApiResponse::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_prefers_json_fields() {
        assert_eq!(
            error_message("application/json", Some(r#"{"message":"bad","error":"worse"}"#)),
            Some("bad".to_string())
        );
        assert_eq!(
            error_message("application/json; charset=utf-8", Some(r#"{"error":"worse"}"#)),
            Some("worse".to_string())
        );
        assert_eq!(
            error_message("application/json", Some(r#"{"code":7}"#)),
            Some(r#"{"code":7}"#.to_string())
        );
        assert_eq!(error_message("text/plain", Some("nope")), Some("nope".to_string()));
        assert_eq!(error_message("text/plain", Some("  ")), None);
        assert_eq!(error_message("text/plain", None), None);
    }

    #[test]
    fn test_into_message() {
        assert_eq!(ApiResponse::Text("ok".into()).into_message(), "ok");
        assert_eq!(ApiResponse::Json(json!("done")).into_message(), "done");
        assert_eq!(ApiResponse::Json(json!({"message": "saved"})).into_message(), "saved");
        assert_eq!(ApiResponse::Empty.into_message(), "");
    }

    #[test]
    fn test_into_value_parses_text_json() {
        assert_eq!(ApiResponse::Text("[1,2]".into()).into_value(), json!([1, 2]));
        assert_eq!(ApiResponse::Text("hello".into()).into_value(), json!("hello"));
        assert_eq!(ApiResponse::Empty.into_value(), Value::Null);
    }
}
