use crate::endpoints::Endpoints;
use anyhow::Result;

#[derive(Clone, Debug)]
pub struct ClientConfiguration {
    pub server_url: String,
    pub access_token: Option<String>,
}

impl ClientConfiguration {
    pub fn new(server_url: impl Into<String>, access_token: Option<String>) -> Self {
        Self {
            server_url: server_url.into(),
            access_token: access_token.filter(|token| !token.trim().is_empty()),
        }
    }

    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::from_server_url(&self.server_url)
    }
}
