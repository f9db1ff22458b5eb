use axum::extract::State;

use crate::db::{AppState, queries};
use crate::error::Result;
use crate::extractors::{Json, Path};
use crate::models::License;

/// GET /api/license/user/{user_id}
pub async fn list_user_licenses(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<License>>> {
    let conn = state.db.get()?;
    let licenses = queries::list_licenses_for_user(&conn, &user_id)?;
    Ok(Json(licenses))
}
