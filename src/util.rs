//! Shared utility functions.

use axum::http::HeaderMap;
use chrono::{DateTime, Months, Utc};

use crate::error::{AppError, Result};

/// Current Unix time in seconds.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Expiry for a license issued at `base_time`: one calendar month later.
///
/// The day of month is clamped to the end of the target month, so an
/// activation on Jan 31 expires on the last day of February.
pub fn license_expiry(base_time: i64) -> Result<i64> {
    DateTime::<Utc>::from_timestamp(base_time, 0)
        .and_then(|dt| dt.checked_add_months(Months::new(1)))
        .map(|dt| dt.timestamp())
        .ok_or_else(|| AppError::Internal(format!("Cannot compute expiry for {}", base_time)))
}

/// Extract client IP address and user-agent from request headers.
///
/// Tries `x-forwarded-for` first (for proxied requests), then `x-real-ip`.
pub fn extract_request_info(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip = headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    (ip, user_agent)
}
