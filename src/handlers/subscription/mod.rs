use axum::{Router, extract::State, routing::get};

use crate::db::{AppState, queries};
use crate::error::Result;
use crate::extractors::{Json, Path};
use crate::models::Subscription;

/// GET /api/subscription/user/{user_id}
pub async fn list_user_subscriptions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Subscription>>> {
    let conn = state.db.get()?;
    let subscriptions = queries::list_subscriptions_for_user(&conn, &user_id)?;
    Ok(Json(subscriptions))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/user/{user_id}", get(list_user_subscriptions))
}
