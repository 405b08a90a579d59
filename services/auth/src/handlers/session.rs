use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::session::{
    CreateSessionInput, CreateSessionUseCase, SESSION_TOKEN_EXP, validate_session_token,
};

/// Cookie name for the session token.
pub const SESSION_COOKIE: &str = "leadmachine_session";

const X_SESSION_EXPIRES: &str = "x-leadmachine-session-expires";

fn session_expires_header(exp: u64) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(X_SESSION_EXPIRES),
        HeaderValue::from_str(&exp.to_string()).unwrap(),
    )
}

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use leadmachine_auth::handlers::session::{set_session_cookie, SESSION_COOKIE};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), "example.com".to_string());
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(SESSION_TOKEN_EXP as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use leadmachine_auth::handlers::session::{
///     clear_session_cookie, set_session_cookie, SESSION_COOKIE,
/// };
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), "example.com".to_string());
/// let jar = clear_session_cookie(jar, "example.com".to_string());
/// let cookie = jar.get(SESSION_COOKIE).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

// ── POST /auth/session ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub email: String,
    pub code: String,
}

pub async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = CreateSessionUseCase {
        codes: state.access_codes(),
        jwt_secret: state.jwt_secret.clone(),
    };

    let out = usecase
        .execute(CreateSessionInput {
            email: body.email,
            code: body.code,
        })
        .await?;

    let jar = set_session_cookie(jar, out.session_token, state.cookie_domain.clone());

    let mut headers = HeaderMap::new();
    let (name, value) = session_expires_header(out.session_exp);
    headers.insert(name, value);

    Ok((StatusCode::CREATED, jar, headers))
}

// ── GET /auth/session ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionInfoResponse {
    pub email: String,
    pub session_exp: u64,
}

pub async fn check_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .ok_or(AuthServiceError::InvalidSession)?;

    let claims = validate_session_token(&token, &state.jwt_secret)?;

    let body = SessionInfoResponse {
        email: claims.sub,
        session_exp: claims.exp,
    };

    let mut headers = HeaderMap::new();
    let (name, value) = session_expires_header(body.session_exp);
    headers.insert(name, value);

    Ok((StatusCode::OK, headers, Json(body)))
}

// ── DELETE /auth/session ──────────────────────────────────────────────────────

pub async fn delete_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
