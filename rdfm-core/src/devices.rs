use crate::endpoints::Endpoints;
use crate::resources::{ResourceAccessor, ResourcesGetter};
use anyhow::{Context, Result};
use rdfm_domain::{PendingDevice, RegisterDeviceRequest, RegisteredDevice, RequestOutput};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;
use std::sync::Arc;
use tracing::{debug_span, event, Instrument, Level};

const REGISTRATION_FAILURE_MESSAGES: [(StatusCode, &str); 2] = [
    (
        StatusCode::UNAUTHORIZED,
        "User did not provide authorization data, or the authorization has expired.",
    ),
    (
        StatusCode::FORBIDDEN,
        "User was authorized, but did not have permission to change device registration status",
    ),
];

pub fn registration_failure_message(code: u16) -> String {
    REGISTRATION_FAILURE_MESSAGES
        .iter()
        .find(|(status, _)| status.as_u16() == code)
        .map(|(_, message)| message.to_string())
        .unwrap_or_else(|| format!("Failed to register device. Got a response code of {}", code))
}

/// Promotes pending devices to registered ones and keeps both device caches in sync with the server.
#[derive(Debug, Clone)]
pub struct DeviceRegistration {
    pending_devices: Arc<dyn ResourceAccessor>,
    registered_devices: Arc<dyn ResourceAccessor>,
    register_device_url: String,
}

impl DeviceRegistration {
    pub fn new(
        pending_devices: Arc<dyn ResourceAccessor>,
        registered_devices: Arc<dyn ResourceAccessor>,
        register_device_url: impl Into<String>,
    ) -> Self {
        Self {
            pending_devices,
            registered_devices,
            register_device_url: register_device_url.into(),
        }
    }

    /// Issues exactly one registration request. Status failures are turned into a
    /// [`RequestOutput::Failure`]; only transport errors end up in `Err`.
    ///
    /// On success both caches have been refreshed (pending first) before this returns.
    pub async fn register_device(&self, mac_address: &str, public_key: &str) -> Result<RequestOutput> {
        let span = debug_span!("register_device", mac_address);

        async move {
            let body = serde_json::to_string(&RegisterDeviceRequest {
                mac_address: mac_address.to_string(),
                public_key: public_key.to_string(),
            })
            .context("Failed to encode registration request")?;

            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/javascript"));

            let out = self
                .pending_devices
                .fetch_post(&self.register_device_url, headers, body)
                .await?;

            if !out.success {
                event!(Level::INFO, "Registration was rejected with status {}", out.code);
                return Ok(RequestOutput::failure(registration_failure_message(out.code)));
            }

            event!(Level::INFO, "Device registered. Refreshing device lists");
            self.refresh_all().await?;

            Ok(RequestOutput::Success)
        }
        .instrument(span)
        .await
    }

    /// Refreshes the pending list, then the registered list.
    pub async fn refresh_all(&self) -> Result<()> {
        let pending = self.pending_devices.fetch_resources().await?;
        if !pending.success {
            event!(Level::WARN, "Refreshing pending devices returned status {}", pending.code);
        }

        let registered = self.registered_devices.fetch_resources().await?;
        if !registered.success {
            event!(Level::WARN, "Refreshing registered devices returned status {}", registered.code);
        }

        Ok(())
    }
}

/// Owns the two device caches of a management server and hands out the registration adapter.
#[derive(Debug, Clone)]
pub struct DeviceResources {
    pub pending: Arc<ResourcesGetter<Vec<PendingDevice>>>,
    pub registered: Arc<ResourcesGetter<Vec<RegisteredDevice>>>,
    register_device_url: String,
}

impl DeviceResources {
    pub fn new(client: ClientWithMiddleware, endpoints: &Endpoints) -> Self {
        Self {
            pending: Arc::new(ResourcesGetter::new(client.clone(), endpoints.pending.clone())),
            registered: Arc::new(ResourcesGetter::new(client, endpoints.devices.clone())),
            register_device_url: endpoints.register_device.clone(),
        }
    }

    pub fn registration(&self) -> DeviceRegistration {
        DeviceRegistration::new(
            Arc::clone(&self.pending) as Arc<dyn ResourceAccessor>,
            Arc::clone(&self.registered) as Arc<dyn ResourceAccessor>,
            self.register_device_url.clone(),
        )
    }

    pub async fn pending_devices(&self) -> Vec<PendingDevice> {
        self.pending.resources().await.unwrap_or_default()
    }

    pub async fn registered_devices(&self) -> Vec<RegisteredDevice> {
        self.registered.resources().await.unwrap_or_default()
    }
}
