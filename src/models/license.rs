use serde::{Deserialize, Serialize};

/// A license key bound to exactly one user and one device.
///
/// Usable only while `valid` is true, `expires_at` is in the future, and the
/// caller presents the fingerprint of `device_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    pub key: String,
    pub user_id: String,
    pub device_id: String,
    pub plan: String,
    pub valid: bool,
    pub expires_at: i64,
    /// Provider name as reported by the client (unverified)
    pub payment_provider: Option<String>,
    /// Provider payment/order reference as reported by the client (unverified)
    pub payment_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLicense {
    pub plan: String,
    #[serde(default)]
    pub payment_provider: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
}

/// Result of a successful activation.
#[derive(Debug, Clone)]
pub struct Activation {
    pub license: License,
    pub device: super::DeviceAcquisition,
}
