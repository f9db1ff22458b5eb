//! Shared webhook receiving for payment providers.
//!
//! Receivers acknowledge events and log them. They do not yet update
//! subscriptions or licenses, so an acknowledged event has no side effects.

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
};

use crate::db::AppState;
use crate::util::extract_request_info;

/// Result type for webhook operations.
pub type WebhookResult = (StatusCode, &'static str);

/// Provider-specific parts of webhook handling.
pub trait WebhookProvider: Send + Sync {
    /// Provider name for logging (e.g., "razorpay", "paypal")
    fn provider_name(&self) -> &'static str;

    /// Authenticate the delivery. Default accepts everything.
    fn verify(&self, _state: &AppState, _headers: &HeaderMap, _body: &Bytes) -> Result<(), WebhookResult> {
        Ok(())
    }

    /// Pull the event type out of a parsed payload, if present.
    fn event_name(&self, payload: &serde_json::Value) -> Option<String>;
}

/// Verify, log and acknowledge a webhook delivery.
///
/// Unparseable bodies are still acknowledged: providers retry on non-2xx and
/// there is nothing to process yet.
pub fn handle_webhook<P: WebhookProvider>(
    provider: &P,
    state: &AppState,
    headers: &HeaderMap,
    body: &Bytes,
) -> WebhookResult {
    if let Err(rejection) = provider.verify(state, headers, body) {
        tracing::warn!(
            provider = provider.provider_name(),
            reason = rejection.1,
            "Webhook rejected"
        );
        return rejection;
    }

    let event = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|payload| provider.event_name(&payload));
    let (ip, _) = extract_request_info(headers);

    tracing::info!(
        provider = provider.provider_name(),
        event = event.as_deref().unwrap_or("unknown"),
        bytes = body.len(),
        ip = ?ip,
        "Webhook received (not processed)"
    );

    (StatusCode::OK, "ok")
}
