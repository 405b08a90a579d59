use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("invalid access code")]
    InvalidAccessCode,
    #[error("session expired")]
    InvalidSession,
    #[error("code delivery failed")]
    DeliveryFailed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidAccessCode => "INVALID_ACCESS_CODE",
            Self::InvalidSession => "INVALID_SESSION",
            Self::DeliveryFailed => "DELIVERY_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidEmail => StatusCode::BAD_REQUEST,
            Self::InvalidAccessCode | Self::InvalidSession => StatusCode::UNAUTHORIZED,
            Self::DeliveryFailed => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
