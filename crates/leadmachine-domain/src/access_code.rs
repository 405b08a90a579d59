//! The access-code entity and its lifecycle.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access-code time-to-live in minutes.
pub const ACCESS_CODE_TTL_MINS: i64 = 15;

/// Access-code length in characters (digits only).
pub const ACCESS_CODE_LEN: usize = 6;

/// Maximum number of retained history entries; oldest evicted first.
pub const MAX_CODE_HISTORY: usize = 100;

/// One-time access code emailed to a dashboard user.
///
/// A code is consumed by setting `used_at`; `used_at == None` means the code
/// was never accepted. Expiry is fixed at issue time and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCode {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of an access code at a point in time.
///
/// `Consumed` is terminal and stored (`used_at` set). `Expired` is computed
/// from the clock at read time, never stored; an expired entry stays in the
/// history until purged or evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStatus {
    Issued,
    Consumed,
    Expired,
}

impl AccessCode {
    /// Build a fresh code record for `email`, expiring exactly
    /// [`ACCESS_CODE_TTL_MINS`] after `now`.
    pub fn issue(email: String, code: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            code,
            created_at: now,
            expires_at: now + Duration::minutes(ACCESS_CODE_TTL_MINS),
            used_at: None,
        }
    }

    pub fn status_at(&self, at: DateTime<Utc>) -> CodeStatus {
        if self.used_at.is_some() {
            CodeStatus::Consumed
        } else if self.expires_at <= at {
            CodeStatus::Expired
        } else {
            CodeStatus::Issued
        }
    }

    /// An unused, unexpired code is the only kind `consume` will accept.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.status_at(at) == CodeStatus::Issued
    }

    /// Set `used_at` once; consumption never reverts and the first
    /// timestamp wins.
    pub fn mark_used(&mut self, at: DateTime<Utc>) {
        if self.used_at.is_none() {
            self.used_at = Some(at);
        }
    }
}
