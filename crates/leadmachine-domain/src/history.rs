//! Ordered access-code history and its list operations.
//!
//! The history is the unit of persistence: adapters load it whole, apply one
//! operation, and write it back whole. All operations take the clock as an
//! argument.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::access_code::{AccessCode, CodeStatus, MAX_CODE_HISTORY};

/// Why `consume` rejected a code. Callers surface a plain failure; the
/// reason exists for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConsumeError {
    #[error("no matching code")]
    NotFound,
    #[error("code already used")]
    AlreadyUsed,
    #[error("code expired")]
    Expired,
}

/// Insertion-ordered list of issued codes, capped at
/// [`MAX_CODE_HISTORY`] entries.
///
/// Serializes transparently as a bare JSON array — the persisted layout is
/// the list itself, nothing more.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeHistory(Vec<AccessCode>);

impl CodeHistory {
    /// Append a freshly issued code, evicting oldest entries beyond the cap.
    ///
    /// Eviction is purely insertion-order FIFO; whether an evicted entry was
    /// used, valid, or expired plays no part.
    pub fn push_capped(&mut self, code: AccessCode) {
        self.0.push(code);
        if self.0.len() > MAX_CODE_HISTORY {
            let overflow = self.0.len() - MAX_CODE_HISTORY;
            self.0.drain(..overflow);
        }
    }

    /// Consume the first entry in stored order matching `email` and `code`
    /// exactly that is unused and unexpired at `now`.
    ///
    /// On success the entry's `used_at` is set to `now` and the updated
    /// record is returned. On a miss nothing is mutated; the error says
    /// whether the pair was unknown, already consumed, or expired. Matching
    /// is exact and case-sensitive.
    pub fn consume(
        &mut self,
        email: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessCode, ConsumeError> {
        let hit = self
            .0
            .iter()
            .position(|c| c.email == email && c.code == code && c.is_valid_at(now));

        if let Some(index) = hit {
            let entry = &mut self.0[index];
            entry.mark_used(now);
            return Ok(entry.clone());
        }

        let mut matched = self
            .0
            .iter()
            .filter(|c| c.email == email && c.code == code)
            .peekable();
        if matched.peek().is_none() {
            return Err(ConsumeError::NotFound);
        }
        // A consumed match outranks an expired one in the report.
        if matched.any(|c| c.used_at.is_some()) {
            Err(ConsumeError::AlreadyUsed)
        } else {
            Err(ConsumeError::Expired)
        }
    }

    /// All unused, unexpired entries for `email`, in stored order.
    pub fn valid_for(&self, email: &str, now: DateTime<Utc>) -> Vec<AccessCode> {
        self.0
            .iter()
            .filter(|c| c.email == email && c.is_valid_at(now))
            .cloned()
            .collect()
    }

    /// Drop every entry that is expired and was never used. Consumed entries
    /// survive regardless of expiry (they are the audit trail). Returns the
    /// number removed; calling again without the clock moving removes zero.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.0.len();
        self.0.retain(|c| c.status_at(now) != CodeStatus::Expired);
        before - self.0.len()
    }

    pub fn as_slice(&self) -> &[AccessCode] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<AccessCode>> for CodeHistory {
    fn from(codes: Vec<AccessCode>) -> Self {
        Self(codes)
    }
}
