use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::repository::AccessCodeRepository;
use crate::error::AuthServiceError;

/// Session JWT lifetime in seconds (7 days).
pub const SESSION_TOKEN_EXP: u64 = 604800;

/// JWT claims for the session token. `sub` carries the email the code was
/// redeemed for.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_session_token(email: &str, secret: &str) -> Result<(String, u64), AuthServiceError> {
    let exp = now_secs() + SESSION_TOKEN_EXP;
    let claims = SessionClaims {
        sub: email.to_owned(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

/// Validate a session token (signature + expiry) and return its claims.
pub fn validate_session_token(
    token: &str,
    secret: &str,
) -> Result<SessionClaims, AuthServiceError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AuthServiceError::InvalidSession)?;

    Ok(data.claims)
}

// ── CreateSession (login) ─────────────────────────────────────────────────────

pub struct CreateSessionInput {
    pub email: String,
    pub code: String,
}

#[derive(Debug)]
pub struct CreateSessionOutput {
    pub email: String,
    pub session_token: String,
    pub session_exp: u64,
}

pub struct CreateSessionUseCase<R: AccessCodeRepository> {
    pub codes: R,
    pub jwt_secret: String,
}

impl<R: AccessCodeRepository> CreateSessionUseCase<R> {
    pub async fn execute(
        &self,
        input: CreateSessionInput,
    ) -> Result<CreateSessionOutput, AuthServiceError> {
        // 1. Redeem the code → 401 on any miss
        let consumed = self.codes.consume(&input.email, &input.code).await?;
        if !consumed {
            return Err(AuthServiceError::InvalidAccessCode);
        }

        // 2. Issue the session token
        let (session_token, session_exp) = issue_session_token(&input.email, &self.jwt_secret)?;

        Ok(CreateSessionOutput {
            email: input.email,
            session_token,
            session_exp,
        })
    }
}
