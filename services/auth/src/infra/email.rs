use reqwest::Client;
use serde_json::json;
use tracing::warn;

use crate::config::EmailJsConfig;
use crate::domain::repository::CodeNotifier;
use crate::domain::types::CodeDelivery;
use crate::error::AuthServiceError;

/// Sends access-code mail through the EmailJS REST API.
#[derive(Clone)]
pub struct EmailJsNotifier {
    pub client: Client,
    pub config: EmailJsConfig,
}

impl CodeNotifier for EmailJsNotifier {
    async fn send_access_code(&self, delivery: &CodeDelivery) -> Result<(), AuthServiceError> {
        let payload = json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.public_key,
            "template_params": {
                "to_email": delivery.to_email,
                "from_email": delivery.from_email,
                "access_code": delivery.access_code,
                "expires_in": delivery.expires_in_mins,
                "login_link": delivery.login_link,
            },
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "emailjs request failed");
                AuthServiceError::DeliveryFailed
            })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "emailjs rejected the send");
            return Err(AuthServiceError::DeliveryFailed);
        }
        Ok(())
    }
}
