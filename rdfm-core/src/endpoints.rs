use anyhow::{Context, Result};
use reqwest::Url;

pub const PENDING_PATH: &str = "/api/v2/auth/pending";
pub const DEVICES_PATH: &str = "/api/v2/devices";
pub const REGISTER_DEVICE_PATH: &str = "/api/v1/auth/register";

/// Absolute urls of the management server resources used by the device views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub pending: String,
    pub devices: String,
    pub register_device: String,
}

impl Endpoints {
    pub fn from_server_url(server_url: &str) -> Result<Self> {
        let url = Url::parse(server_url).with_context(|| format!("Invalid server url '{server_url}'"))?;

        if url.cannot_be_a_base() {
            anyhow::bail!("Server url '{server_url}' cannot be used as a base url");
        }

        // string concatenation keeps a path prefix (e.g. a reverse proxy mount point), Url::join would drop it
        let base = server_url.trim_end_matches('/');

        Ok(Self {
            pending: format!("{base}{PENDING_PATH}"),
            devices: format!("{base}{DEVICES_PATH}"),
            register_device: format!("{base}{REGISTER_DEVICE_PATH}"),
        })
    }
}
