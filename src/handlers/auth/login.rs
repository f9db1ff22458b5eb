use axum::extract::State;
use serde::Serialize;

use crate::crypto;
use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::Credentials;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

/// POST /api/auth/login
///
/// Unknown email and wrong password are indistinguishable (both 401).
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> Result<Json<LoginResponse>> {
    let user = {
        let conn = state.db.get()?;
        queries::get_user_by_email(&conn, &req.email)?
    };
    let Some(user) = user else {
        return Err(AppError::Unauthorized);
    };

    if !crypto::verify_password_async(req.password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
        return Err(AppError::Unauthorized);
    }

    let token = state.sessions.issue(&user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        success: true,
        token,
    }))
}
