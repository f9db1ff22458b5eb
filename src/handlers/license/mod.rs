mod activate;
mod list;
mod validate;

pub use activate::*;
pub use list::*;
pub use validate::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::db::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/activate", post(activate_license))
        .route("/validate", post(validate_license))
        .route("/user/{user_id}", get(list_user_licenses))
}
