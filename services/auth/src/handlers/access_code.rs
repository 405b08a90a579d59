use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::access_code::{
    ListValidCodesUseCase, PurgeExpiredUseCase, RequestAccessCodeInput, RequestAccessCodeUseCase,
};

// ── POST /auth/code ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestAccessCodeRequest {
    pub email: String,
}

pub async fn create_access_code(
    State(state): State<AppState>,
    Json(body): Json<RequestAccessCodeRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = RequestAccessCodeUseCase {
        codes: state.access_codes(),
        notifier: state.notifier(),
        app_origin: state.app_origin.clone(),
        sender_email: state.sender_email.clone(),
    };
    usecase
        .execute(RequestAccessCodeInput { email: body.email })
        .await?;
    Ok(StatusCode::CREATED)
}

// ── GET /auth/codes ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListCodesQuery {
    pub email: String,
}

#[derive(Serialize)]
pub struct AccessCodeResponse {
    pub id: uuid::Uuid,
    pub email: String,
    pub code: String,
    #[serde(serialize_with = "leadmachine_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "leadmachine_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "leadmachine_core::serde::to_rfc3339_ms_opt")]
    pub used_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub async fn list_valid_codes(
    State(state): State<AppState>,
    Query(query): Query<ListCodesQuery>,
) -> Result<Json<Vec<AccessCodeResponse>>, AuthServiceError> {
    let usecase = ListValidCodesUseCase {
        codes: state.access_codes(),
    };
    let codes = usecase.execute(&query.email).await?;
    let body = codes
        .into_iter()
        .map(|c| AccessCodeResponse {
            id: c.id,
            email: c.email,
            code: c.code,
            created_at: c.created_at,
            expires_at: c.expires_at,
            used_at: c.used_at,
        })
        .collect();
    Ok(Json(body))
}

// ── DELETE /auth/codes/expired ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PurgeExpiredResponse {
    pub removed: usize,
}

pub async fn purge_expired_codes(
    State(state): State<AppState>,
) -> Result<Json<PurgeExpiredResponse>, AuthServiceError> {
    let usecase = PurgeExpiredUseCase {
        codes: state.access_codes(),
    };
    let removed = usecase.execute().await?;
    Ok(Json(PurgeExpiredResponse { removed }))
}
