use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use super::common::{WebhookProvider, WebhookResult, handle_webhook};
use crate::crypto::verify_hmac_sha256_hex;
use crate::db::AppState;

pub const SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// Razorpay webhook provider implementation.
pub struct RazorpayWebhookProvider;

impl WebhookProvider for RazorpayWebhookProvider {
    fn provider_name(&self) -> &'static str {
        "razorpay"
    }

    /// Razorpay signs the raw body with HMAC-SHA256 using the webhook secret.
    /// Without a configured secret every delivery is accepted.
    fn verify(&self, state: &AppState, headers: &HeaderMap, body: &Bytes) -> Result<(), WebhookResult> {
        let Some(secret) = state.razorpay_webhook_secret.as_deref() else {
            return Ok(());
        };

        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing signature"))?;

        match verify_hmac_sha256_hex(secret, body, signature) {
            Ok(true) => Ok(()),
            Ok(false) => Err((StatusCode::UNAUTHORIZED, "Invalid signature")),
            Err(e) => {
                tracing::error!("Razorpay signature check failed: {}", e);
                Err((StatusCode::INTERNAL_SERVER_ERROR, "Signature check failed"))
            }
        }
    }

    fn event_name(&self, payload: &serde_json::Value) -> Option<String> {
        payload.get("event")?.as_str().map(String::from)
    }
}

/// POST /api/payment/razorpay/webhook
pub async fn handle_razorpay_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    handle_webhook(&RazorpayWebhookProvider, &state, &headers, &body)
}
