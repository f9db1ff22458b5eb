use axum::extract::State;
use serde::Serialize;

use crate::crypto;
use crate::db::{AppState, queries};
use crate::error::{AppError, Result, msg};
use crate::extractors::Json;
use crate::models::Credentials;

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// POST /api/auth/register
///
/// Any failure other than input validation, including a duplicate email,
/// surfaces as a generic 400.
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> Result<Json<RegisterResponse>> {
    req.validate()?;

    let password_hash = crypto::hash_password_async(req.password)
        .await
        .map_err(|e| e.into_bad_request(msg::REGISTRATION_FAILED))?;

    let conn = state
        .db
        .get()
        .map_err(|e| AppError::from(e).into_bad_request(msg::REGISTRATION_FAILED))?;
    let user = queries::create_user(&conn, &req.email, &password_hash).map_err(|e| {
        if e.is_unique_violation() {
            tracing::debug!("Registration rejected: email already registered");
            AppError::BadRequest(msg::REGISTRATION_FAILED.into())
        } else {
            e.into_bad_request(msg::REGISTRATION_FAILED)
        }
    })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(RegisterResponse {
        success: true,
        user_id: user.id,
    }))
}
