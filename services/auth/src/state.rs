use std::sync::Arc;

use deadpool_redis::Pool as RedisPool;
use reqwest::Client;
use tokio::sync::Mutex;
use url::Url;

use crate::config::EmailJsConfig;
use crate::infra::email::EmailJsNotifier;
use crate::infra::redis::RedisAccessCodeRepository;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub redis: RedisPool,
    /// Serializes code-history rewrites. One instance owns the Redis key.
    pub history_lock: Arc<Mutex<()>>,
    pub http: Client,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub app_origin: Url,
    pub sender_email: String,
    pub emailjs: EmailJsConfig,
}

impl AppState {
    pub fn access_codes(&self) -> RedisAccessCodeRepository {
        RedisAccessCodeRepository {
            pool: self.redis.clone(),
            write_lock: Arc::clone(&self.history_lock),
        }
    }

    pub fn notifier(&self) -> EmailJsNotifier {
        EmailJsNotifier {
            client: self.http.clone(),
            config: self.emailjs.clone(),
        }
    }
}
