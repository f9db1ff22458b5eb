use axum::{extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result, msg};
use crate::extractors::Json;
use crate::models::CreateLicense;
use crate::util::extract_request_info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivateRequest {
    pub user_id: String,
    pub device_fingerprint: String,
    pub plan: String,
    /// Reported by the client, not verified against the provider
    #[serde(default)]
    pub payment_provider: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivateResponse {
    pub success: bool,
    #[serde(rename = "licenseKey")]
    pub license_key: String,
    pub expires_at: i64,
}

/// POST /api/license/activate
///
/// Mints a new one-month license bound to the caller's device, registering
/// the device on first sight. Every failure is a 400.
pub async fn activate_license(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ActivateRequest>,
) -> Result<Json<ActivateResponse>> {
    let mut conn = state
        .db
        .get()
        .map_err(|e| AppError::from(e).into_bad_request(msg::ACTIVATION_FAILED))?;

    let input = CreateLicense {
        plan: req.plan,
        payment_provider: req.payment_provider,
        payment_id: req.payment_id,
    };

    let activation =
        queries::activate_license(&mut conn, &req.user_id, &req.device_fingerprint, &input)
            .map_err(|e| e.into_bad_request(msg::ACTIVATION_FAILED))?;

    let (ip, user_agent) = extract_request_info(&headers);
    tracing::info!(
        user_id = %activation.license.user_id,
        device_id = %activation.device.device().id,
        new_device = activation.device.is_new(),
        plan = %activation.license.plan,
        payment_provider = ?activation.license.payment_provider,
        ip = ?ip,
        user_agent = ?user_agent,
        "License activated"
    );

    Ok(Json(ActivateResponse {
        success: true,
        license_key: activation.license.key,
        expires_at: activation.license.expires_at,
    }))
}
