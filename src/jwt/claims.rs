use serde::{Deserialize, Serialize};

/// Custom claims carried by a session token.
/// Standard claims (iss, sub, iat, exp) are handled by jwt-simple; `sub` holds the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
}

/// A session token that passed signature, issuer and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSession {
    pub user_id: String,
    pub email: String,
    /// Unix seconds, None only for tokens minted without a TTL
    pub expires_at: Option<i64>,
}
