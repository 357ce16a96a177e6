//! Error handling for CuacaMap
//!
//! Provides consistent error responses in Indonesian and English

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        field: String,
        message: String,
        message_id: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Upstream (BMKG) errors
    #[error("BMKG request timed out")]
    UpstreamTimeout,

    #[error("BMKG unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("BMKG error: {message}")]
    UpstreamError {
        status: Option<u16>,
        message: String,
    },

    // Local data errors
    #[error("Village dataset unavailable")]
    DataUnavailable,

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Input error on a named query parameter
    pub fn invalid_input(
        field: impl Into<String>,
        message: impl Into<String>,
        message_id: impl Into<String>,
    ) -> Self {
        AppError::InvalidInput {
            field: field.into(),
            message: message.into(),
            message_id: message_id.into(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidInput {
                field,
                message,
                message_id,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_INPUT".to_string(),
                    message_en: message.clone(),
                    message_id: message_id.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_INPUT".to_string(),
                    message_en: msg.clone(),
                    message_id: format!("Data tidak valid: {}", msg),
                    field: None,
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_id: format!("Tidak ditemukan: {}", resource),
                    field: None,
                },
            ),
            AppError::UpstreamTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                ErrorDetail {
                    code: "UPSTREAM_TIMEOUT".to_string(),
                    message_en: "BMKG did not respond in time, please try again later"
                        .to_string(),
                    message_id: "API BMKG tidak merespons dalam waktu yang ditentukan".to_string(),
                    field: None,
                },
            ),
            AppError::UpstreamUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "UPSTREAM_UNAVAILABLE".to_string(),
                    message_en: "Unable to connect to the BMKG server".to_string(),
                    message_id: "Tidak dapat terhubung ke server BMKG".to_string(),
                    field: None,
                },
            ),
            AppError::UpstreamError { status, message } => {
                let status_text = status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "invalid response".to_string());
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorDetail {
                        code: "UPSTREAM_ERROR".to_string(),
                        message_en: format!("BMKG API error ({}): {}", status_text, message),
                        message_id: format!("Server BMKG mengalami masalah ({})", status_text),
                        field: None,
                    },
                )
            }
            AppError::DataUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "DATA_UNAVAILABLE".to_string(),
                    message_en: "Village data is not available".to_string(),
                    message_id: "Data desa tidak tersedia".to_string(),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message_en: format!("Configuration error: {}", msg),
                    message_id: format!("Kesalahan konfigurasi: {}", msg),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_id: "Terjadi kesalahan internal pada server".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {:?}", self);
        }

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: error_detail,
            }),
        )
            .into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(status_of(AppError::NotFound("Desa".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::invalid_input("adm4", "bad", "salah")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(AppError::UpstreamTimeout), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            status_of(AppError::UpstreamUnavailable("refused".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(AppError::UpstreamError {
                status: Some(500),
                message: "boom".into()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(status_of(AppError::DataUnavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_of(AppError::Configuration("bad url".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_is_bilingual() {
        let response = AppError::DataUnavailable.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "DATA_UNAVAILABLE");
        assert_eq!(body["error"]["message_id"], "Data desa tidak tersedia");
        assert!(body["error"]["message_en"].is_string());
        assert!(body["error"].get("field").is_none());
    }
}
