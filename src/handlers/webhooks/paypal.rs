use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
};

use super::common::{WebhookProvider, handle_webhook};
use crate::db::AppState;

/// PayPal webhook provider implementation.
///
/// PayPal signatures are verified through a PayPal API call, which this
/// server does not make; deliveries are accepted unauthenticated.
pub struct PaypalWebhookProvider;

impl WebhookProvider for PaypalWebhookProvider {
    fn provider_name(&self) -> &'static str {
        "paypal"
    }

    fn event_name(&self, payload: &serde_json::Value) -> Option<String> {
        payload.get("event_type")?.as_str().map(String::from)
    }
}

/// POST /api/payment/paypal/webhook
pub async fn handle_paypal_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    handle_webhook(&PaypalWebhookProvider, &state, &headers, &body)
}
