use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A device that has contacted the server but was not yet approved by an administrator.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PendingDevice {
    pub mac_address: String,
    pub public_key: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_appeared: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisteredDevice {
    pub id: i64,
    pub name: String,
    pub mac_address: String,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_access: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capabilities: HashMap<String, bool>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub groups: Vec<i64>,
}

/// Body of the register-device action. Only these two keys are ever sent.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterDeviceRequest {
    pub mac_address: String,
    pub public_key: String,
}

/// Result of a mutating request as seen by the resource accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOutcome {
    pub success: bool,
    pub code: u16,
}

impl FetchOutcome {
    pub fn from_status_code(code: u16) -> Self {
        Self {
            success: (200..300).contains(&code),
            code,
        }
    }
}

// the management server has emitted both RFC 3339 and RFC 2822 (http-date) timestamps
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let maybe_raw: Option<String> = Option::deserialize(deserializer)?;

    match maybe_raw {
        None => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .or_else(|_| DateTime::parse_from_rfc2822(&raw))
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}"))),
    }
}
