use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    NotFound,
    Unavailable,
    #[default]
    Internal,
}

/// Failure payload returned by the remote catalog service.
///
/// `message` is the human-readable text the service chose to expose; callers
/// substitute their own per-operation fallback when it is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code:?}: {}", .message.as_deref().unwrap_or("<no message>"))]
pub struct ApiError {
    #[serde(default)]
    pub code: ErrorCode,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
        }
    }

    pub fn without_message(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
        }
    }

    /// The exposed message, or `fallback` when the payload carried none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_when_message_missing_or_blank() {
        let missing = ApiError::without_message(ErrorCode::Internal);
        assert_eq!(missing.message_or("fallback"), "fallback");

        let blank = ApiError::new(ErrorCode::Internal, "   ");
        assert_eq!(blank.message_or("fallback"), "fallback");

        let present = ApiError::new(ErrorCode::Validation, "quote is locked");
        assert_eq!(present.message_or("fallback"), "quote is locked");
    }

    #[test]
    fn decodes_payload_without_code() {
        let err: ApiError =
            serde_json::from_str(r#"{"message":"boom"}"#).expect("api error payload");
        assert_eq!(err.code, ErrorCode::Internal);
        assert_eq!(err.message.as_deref(), Some("boom"));
    }
}
