/// EmailJS delivery settings.
#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    /// EmailJS service ID (e.g. "service_crm_israel").
    pub service_id: String,
    /// EmailJS template ID for the access-code mail.
    pub template_id: String,
    /// EmailJS public key, sent as `user_id` in the send payload.
    pub public_key: String,
    /// Send endpoint. Overridable for local stubs. Env var: `EMAILJS_API_URL`.
    pub api_url: String,
}

/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// Redis connection URL.
    pub redis_url: String,
    /// HMAC secret for signing session tokens.
    pub jwt_secret: String,
    /// Cookie domain attribute (root domain, e.g. "example.com").
    pub cookie_domain: String,
    /// Web app origin used to build login links (e.g. "https://crm.example.com").
    pub app_origin: String,
    /// Address the access-code mail is sent from.
    pub sender_email: String,
    /// EmailJS credentials.
    pub emailjs: EmailJsConfig,
    /// TCP port to listen on (default 4000). Env var: `AUTH_PORT`.
    pub auth_port: u16,
}

const DEFAULT_EMAILJS_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL").expect("REDIS_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            app_origin: std::env::var("APP_ORIGIN").expect("APP_ORIGIN"),
            sender_email: std::env::var("SENDER_EMAIL").expect("SENDER_EMAIL"),
            emailjs: EmailJsConfig {
                service_id: std::env::var("EMAILJS_SERVICE_ID").expect("EMAILJS_SERVICE_ID"),
                template_id: std::env::var("EMAILJS_TEMPLATE_ID").expect("EMAILJS_TEMPLATE_ID"),
                public_key: std::env::var("EMAILJS_PUBLIC_KEY").expect("EMAILJS_PUBLIC_KEY"),
                api_url: std::env::var("EMAILJS_API_URL")
                    .unwrap_or_else(|_| DEFAULT_EMAILJS_API_URL.to_owned()),
            },
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4000),
        }
    }
}
