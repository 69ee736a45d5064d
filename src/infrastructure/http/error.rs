use std::fmt;

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Failure category, decided where the failure is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiErrorKind {
    /// 401 / 403
    Permission,
    /// 5xx and any other unexpected status
    Server,
    /// 400 / 422
    Validation,
    /// No response: connect, timeout, request build
    Network,
    /// 2xx with `success: false`
    Rejected,
    /// Response body did not match the expected shape
    Decode,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApiErrorKind::Permission => "permission",
            ApiErrorKind::Server => "server",
            ApiErrorKind::Validation => "validation",
            ApiErrorKind::Network => "network",
            ApiErrorKind::Rejected => "rejected",
            ApiErrorKind::Decode => "decode",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let kind = match status.as_u16() {
            401 | 403 => ApiErrorKind::Permission,
            400 | 422 => ApiErrorKind::Validation,
            _ => ApiErrorKind::Server,
        };
        Self {
            kind,
            status: Some(status.as_u16()),
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Rejected,
            status: None,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Decode,
            status: None,
            message: message.into(),
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind == ApiErrorKind::Network
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::decode(err.to_string());
        }
        match err.status() {
            Some(status) => ApiError::from_status(status, err.to_string()),
            None => ApiError::network(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_status_code() {
        let kind = |code: u16| ApiError::from_status(StatusCode::from_u16(code).unwrap(), "x").kind;
        assert_eq!(kind(403), ApiErrorKind::Permission);
        assert_eq!(kind(401), ApiErrorKind::Permission);
        assert_eq!(kind(400), ApiErrorKind::Validation);
        assert_eq!(kind(422), ApiErrorKind::Validation);
        assert_eq!(kind(500), ApiErrorKind::Server);
        assert_eq!(kind(503), ApiErrorKind::Server);
        assert_eq!(kind(404), ApiErrorKind::Server);
    }

    #[test]
    fn message_text_never_decides_the_kind() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "403 Forbidden");
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.status, Some(500));
        assert_eq!(err.to_string(), "403 Forbidden");
    }
}
