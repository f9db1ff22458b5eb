use std::env;

use crate::jwt::MIN_SECRET_LEN;

const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_PORT: u16 = 4000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    /// When set, Razorpay webhooks must carry a valid X-Razorpay-Signature
    pub razorpay_webhook_secret: Option<String>,
    pub dev_mode: bool,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any variable source.
    ///
    /// `JWT_SECRET` is mandatory outside dev mode and must be at least
    /// `MIN_SECRET_LEN` bytes. In dev mode a missing secret is replaced by a
    /// random one, so tokens do not survive a restart.
    pub fn from_lookup<F>(get: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dev_mode = get("LICENSE_SERVER_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = get("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let jwt_secret = match get("JWT_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret) if secret.len() < MIN_SECRET_LEN => {
                return Err(format!(
                    "JWT_SECRET must be at least {} bytes",
                    MIN_SECRET_LEN
                ));
            }
            Some(secret) => secret,
            None if dev_mode => {
                tracing::warn!("JWT_SECRET not set, generating an ephemeral dev secret");
                generate_secret()
            }
            None => return Err("JWT_SECRET must be set (or run with LICENSE_SERVER_ENV=dev)".into()),
        };

        let token_ttl_secs = get("TOKEN_TTL_SECS")
            .and_then(|v| v.parse().ok())
            .filter(|&v: &u64| v > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        Ok(Self {
            host,
            port,
            database_path: get("DATABASE_PATH")
                .unwrap_or_else(|| "license_server.db".to_string()),
            jwt_secret,
            token_ttl_secs,
            razorpay_webhook_secret: get("RAZORPAY_WEBHOOK_SECRET").filter(|s| !s.is_empty()),
            dev_mode,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn generate_secret() -> String {
    use rand::RngCore;
    use rand::rngs::OsRng;
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
