use std::collections::HashSet;

use jwt_simple::prelude::*;

use super::{SessionClaims, VerifiedSession};
use crate::error::{AppError, Result};

/// Issuer stamped on every session token.
pub const ISSUER: &str = "license-server";

/// jwt-simple refuses to sign with HS256 keys under 96 bits.
pub const MIN_SECRET_LEN: usize = 12;

/// Signs and verifies HS256 session tokens with a shared secret.
#[derive(Clone)]
pub struct SessionSigner {
    key: HS256Key,
    ttl_secs: u64,
}

impl SessionSigner {
    /// Fails for secrets the signer could not sign with, so a bad
    /// `JWT_SECRET` stops the server at boot instead of breaking every login.
    pub fn new(secret: &str, ttl_secs: u64) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Internal(format!(
                "JWT secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self {
            key: HS256Key::from_bytes(secret.as_bytes()),
            ttl_secs,
        })
    }

    /// Issue a token for `user_id` carrying `email`.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String> {
        let claims = Claims::with_custom_claims(
            SessionClaims {
                email: email.to_string(),
            },
            Duration::from_secs(self.ttl_secs),
        )
        .with_issuer(ISSUER)
        .with_subject(user_id);

        self.key
            .authenticate(claims)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature, issuer and expiry; return the session identity.
    pub fn verify(&self, token: &str) -> Result<VerifiedSession> {
        let mut allowed_issuers = HashSet::new();
        allowed_issuers.insert(ISSUER.to_string());
        let options = VerificationOptions {
            allowed_issuers: Some(allowed_issuers),
            ..Default::default()
        };

        let claims = self
            .key
            .verify_token::<SessionClaims>(token, Some(options))
            .map_err(|e| {
                tracing::debug!("Session token rejected: {}", e);
                AppError::Unauthorized
            })?;

        let user_id = claims.subject.ok_or(AppError::Unauthorized)?;

        Ok(VerifiedSession {
            user_id,
            email: claims.custom.email,
            expires_at: claims.expires_at.map(|exp| exp.as_secs() as i64),
        })
    }
}
