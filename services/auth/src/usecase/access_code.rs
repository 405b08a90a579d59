use chrono::Utc;
use once_cell::sync::Lazy;
use rand::RngExt;
use regex::Regex;
use url::Url;

use leadmachine_domain::access_code::{ACCESS_CODE_LEN, ACCESS_CODE_TTL_MINS, AccessCode};

use crate::domain::repository::{AccessCodeRepository, CodeNotifier};
use crate::domain::types::CodeDelivery;
use crate::error::AuthServiceError;

/// Charset for generated access codes (digits only).
const CHARSET: &[u8] = b"0123456789";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..ACCESS_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?xi) ^[A-Z0-9._%+-]+@[A-Z0-9-]+(?:\.[A-Z0-9-]+)*\.[A-Z]{2,}$")
        .unwrap()
});

/// Shape check only, not RFC 5322: nonempty local part, one `@`, a dotted
/// domain with an alphabetic final label.
pub fn well_formed_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Deep link back into the app with email and code pre-filled.
fn build_login_link(origin: &Url, email: &str, code: &str) -> String {
    let mut link = origin.clone();
    link.query_pairs_mut()
        .append_pair("email", email)
        .append_pair("code", code);
    link.to_string()
}

// ── RequestAccessCode ─────────────────────────────────────────────────────────

pub struct RequestAccessCodeInput {
    pub email: String,
}

pub struct RequestAccessCodeUseCase<R, N>
where
    R: AccessCodeRepository,
    N: CodeNotifier,
{
    pub codes: R,
    pub notifier: N,
    pub app_origin: Url,
    pub sender_email: String,
}

impl<R, N> RequestAccessCodeUseCase<R, N>
where
    R: AccessCodeRepository,
    N: CodeNotifier,
{
    pub async fn execute(&self, input: RequestAccessCodeInput) -> Result<(), AuthServiceError> {
        // 1. Reject obviously bad addresses → 400
        if !well_formed_email(&input.email) {
            return Err(AuthServiceError::InvalidEmail);
        }

        // 2. Generate the code record
        let code = AccessCode::issue(input.email, generate_code(), Utc::now());

        // 3. Record it in the history before attempting delivery
        self.codes.append(&code).await?;

        // 4. Deliver by mail → 502 if the provider rejects it
        let delivery = CodeDelivery {
            to_email: code.email.clone(),
            from_email: self.sender_email.clone(),
            access_code: code.code.clone(),
            expires_in_mins: ACCESS_CODE_TTL_MINS,
            login_link: build_login_link(&self.app_origin, &code.email, &code.code),
        };
        self.notifier.send_access_code(&delivery).await?;
        Ok(())
    }
}

// ── ListValidCodes ────────────────────────────────────────────────────────────

pub struct ListValidCodesUseCase<R: AccessCodeRepository> {
    pub codes: R,
}

impl<R: AccessCodeRepository> ListValidCodesUseCase<R> {
    pub async fn execute(&self, email: &str) -> Result<Vec<AccessCode>, AuthServiceError> {
        self.codes.list_valid(email).await
    }
}

// ── PurgeExpired ──────────────────────────────────────────────────────────────

pub struct PurgeExpiredUseCase<R: AccessCodeRepository> {
    pub codes: R,
}

impl<R: AccessCodeRepository> PurgeExpiredUseCase<R> {
    pub async fn execute(&self) -> Result<usize, AuthServiceError> {
        self.codes.purge_expired().await
    }
}
