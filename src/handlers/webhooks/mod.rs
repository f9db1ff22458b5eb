pub mod common;
pub mod paypal;
pub mod razorpay;

pub use paypal::handle_paypal_webhook;
pub use razorpay::handle_razorpay_webhook;

use axum::{Router, routing::post};

use crate::db::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/razorpay/webhook", post(handle_razorpay_webhook))
        .route("/paypal/webhook", post(handle_paypal_webhook))
}
