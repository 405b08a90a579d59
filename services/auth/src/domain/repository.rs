#![allow(async_fn_in_trait)]

use leadmachine_domain::access_code::AccessCode;

use crate::domain::types::CodeDelivery;
use crate::error::AuthServiceError;

/// Port over the persisted access-code history.
pub trait AccessCodeRepository: Send + Sync {
    /// Append a freshly issued code to the history.
    async fn append(&self, code: &AccessCode) -> Result<(), AuthServiceError>;

    /// Consume a matching valid code, marking it used. Returns `false` on
    /// any miss (unknown pair, already used, or expired).
    async fn consume(&self, email: &str, code: &str) -> Result<bool, AuthServiceError>;

    /// Valid (unused, unexpired) codes for an email, oldest first.
    async fn list_valid(&self, email: &str) -> Result<Vec<AccessCode>, AuthServiceError>;

    /// Drop expired never-used codes from the history. Returns how many
    /// were removed.
    async fn purge_expired(&self) -> Result<usize, AuthServiceError>;
}

/// Port for delivering an access code to its recipient.
pub trait CodeNotifier: Send + Sync {
    async fn send_access_code(&self, delivery: &CodeDelivery) -> Result<(), AuthServiceError>;
}
