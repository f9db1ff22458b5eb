use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::db::{AppState, queries};
use crate::error::{Result, msg};
use crate::extractors::Json;
use crate::util::now;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub license_key: String,
    pub device_fingerprint: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl ValidateResponse {
    fn rejected(message: &'static str) -> Self {
        Self {
            valid: false,
            plan: None,
            expires_at: None,
            message: Some(message),
        }
    }
}

/// POST /api/license/validate
///
/// 400 when the key is unknown, revoked or expired; 403 when the key is
/// usable but bound to a different device. The distinct 403 tells a caller
/// holding a stolen key that the key itself is live.
pub async fn validate_license(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<(StatusCode, Json<ValidateResponse>)> {
    let conn = state.db.get()?;

    let Some(license) = queries::get_usable_license_by_key(&conn, &req.license_key, now())? else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(ValidateResponse::rejected(msg::INVALID_OR_EXPIRED_LICENSE)),
        ));
    };

    let Some(device) = queries::get_device_by_id_and_fingerprint(
        &conn,
        &license.device_id,
        &req.device_fingerprint,
    )?
    else {
        tracing::debug!(license_id = %license.id, "Validation from unregistered device");
        return Ok((
            StatusCode::FORBIDDEN,
            Json(ValidateResponse::rejected(msg::UNREGISTERED_DEVICE)),
        ));
    };

    queries::update_device_last_seen(&conn, &device.id)?;

    Ok((
        StatusCode::OK,
        Json(ValidateResponse {
            valid: true,
            plan: Some(license.plan),
            expires_at: Some(license.expires_at),
            message: None,
        }),
    ))
}
