use std::sync::Arc;

use chrono::Utc;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use leadmachine_domain::access_code::AccessCode;
use leadmachine_domain::history::CodeHistory;

use crate::domain::repository::AccessCodeRepository;
use crate::error::AuthServiceError;

/// Single Redis key holding the whole history as one JSON array.
const HISTORY_KEY: &str = "access_codes_history";

/// Decode the stored payload. A missing key and a payload that does not
/// parse both come back as an empty history.
fn decode_history(raw: Option<Vec<u8>>) -> CodeHistory {
    match raw {
        Some(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(error = %e, "corrupt code history, treating it as empty");
            CodeHistory::default()
        }),
        None => CodeHistory::default(),
    }
}

/// Access-code history stored under one Redis key, loaded and rewritten
/// whole on every mutation.
///
/// Persistence is best-effort: when Redis is away or the stored value does
/// not parse, reads see an empty history and writes are dropped with a
/// warning instead of failing the caller. The `write_lock` serializes
/// load-mutate-save cycles within this process so concurrent mutations
/// cannot overwrite each other.
#[derive(Clone)]
pub struct RedisAccessCodeRepository {
    pub pool: Pool,
    pub write_lock: Arc<Mutex<()>>,
}

impl RedisAccessCodeRepository {
    async fn load(&self) -> CodeHistory {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "redis unavailable, treating code history as empty");
                return CodeHistory::default();
            }
        };
        let raw = match conn.get::<_, Option<Vec<u8>>>(HISTORY_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to read code history, treating it as empty");
                return CodeHistory::default();
            }
        };
        decode_history(raw)
    }

    async fn save(&self, history: &CodeHistory) {
        let payload = match serde_json::to_vec(history) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "failed to serialize code history, dropping write");
                return;
            }
        };
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "redis unavailable, dropping code history write");
                return;
            }
        };
        if let Err(e) = conn.set::<_, _, ()>(HISTORY_KEY, payload).await {
            warn!(error = %e, "failed to write code history");
        }
    }
}

impl AccessCodeRepository for RedisAccessCodeRepository {
    async fn append(&self, code: &AccessCode) -> Result<(), AuthServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.load().await;
        history.push_capped(code.clone());
        self.save(&history).await;
        Ok(())
    }

    async fn consume(&self, email: &str, code: &str) -> Result<bool, AuthServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.load().await;
        match history.consume(email, code, Utc::now()) {
            Ok(_) => {
                self.save(&history).await;
                Ok(true)
            }
            // Nothing changed on a miss, so nothing is written back.
            Err(reason) => {
                debug!(reason = %reason, "access code rejected");
                Ok(false)
            }
        }
    }

    async fn list_valid(&self, email: &str) -> Result<Vec<AccessCode>, AuthServiceError> {
        let history = self.load().await;
        Ok(history.valid_for(email, Utc::now()))
    }

    async fn purge_expired(&self) -> Result<usize, AuthServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut history = self.load().await;
        let removed = history.purge_expired(Utc::now());
        self.save(&history).await;
        Ok(removed)
    }
}
