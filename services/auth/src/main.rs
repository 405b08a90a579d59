use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::info;
use url::Url;

use leadmachine_auth::config::AuthConfig;
use leadmachine_auth::router::build_router;
use leadmachine_auth::state::AppState;

#[tokio::main]
async fn main() {
    leadmachine_core::tracing::init_tracing();

    let config = AuthConfig::from_env();

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let app_origin = Url::parse(&config.app_origin).expect("invalid APP_ORIGIN");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client");

    let state = AppState {
        redis,
        history_lock: Arc::new(Mutex::new(())),
        http,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        app_origin,
        sender_email: config.sender_email,
        emailjs: config.emailjs,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
