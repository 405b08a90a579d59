use axum::http::StatusCode;

/// `GET /healthz` — liveness probe. Answers as long as the process serves.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz` — readiness probe.
///
/// Deliberately does not check backing stores: the service degrades rather
/// than refuses traffic when persistence is away, so readiness tracks the
/// process, not its dependencies.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
