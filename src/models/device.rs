use serde::{Deserialize, Serialize};

/// A client device, identified by an opaque fingerprint and owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub user_id: String,
    pub fingerprint: String,
    pub last_seen: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Outcome of the find-or-create step during activation.
#[derive(Debug, Clone)]
pub enum DeviceAcquisition {
    /// Device was already registered for this user; last_seen was bumped.
    Existing(Device),
    /// First activation from this fingerprint.
    Created(Device),
}

impl DeviceAcquisition {
    pub fn device(&self) -> &Device {
        match self {
            DeviceAcquisition::Existing(d) | DeviceAcquisition::Created(d) => d,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, DeviceAcquisition::Created(_))
    }
}
