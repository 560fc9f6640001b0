use anyhow::{Context, Result};
use http::Extensions;
use log::{debug, error, warn};
use reqwest::header::HeaderValue;
use reqwest::{Client, Request, Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};
use std::time::Instant;

pub fn create_client(maybe_bearer_token: Option<String>) -> Result<ClientWithMiddleware> {
    let reqwest_client = Client::builder().build().context("Failed to build http client")?;

    let client_builder = ClientBuilder::new(reqwest_client).with(ErrorLoggingMiddleware);

    match maybe_bearer_token {
        None => Ok(client_builder.build()),
        Some(token) => Ok(client_builder
            .with(AuthenticatedHeaderMiddleware::new(&token)?)
            .build()),
    }
}

pub struct AuthenticatedHeaderMiddleware {
    authorization: HeaderValue,
}

impl AuthenticatedHeaderMiddleware {
    pub fn new(bearer_token: &str) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", bearer_token)).context("Access token is not a valid header value")?;
        authorization.set_sensitive(true);

        Ok(Self { authorization })
    }
}

#[async_trait::async_trait]
impl Middleware for AuthenticatedHeaderMiddleware {
    async fn handle(&self, mut req: Request, extensions: &mut Extensions, next: Next<'_>) -> reqwest_middleware::Result<Response> {
        req.headers_mut()
            .insert(reqwest::header::AUTHORIZATION, self.authorization.clone());

        next.run(req, extensions).await
    }
}

pub struct ErrorLoggingMiddleware;

#[async_trait::async_trait]
impl Middleware for ErrorLoggingMiddleware {
    async fn handle(&self, req: Request, extensions: &mut Extensions, next: Next<'_>) -> reqwest_middleware::Result<Response> {
        let start = Instant::now();
        let method = req.method().clone();
        let url = req.url().clone();

        let result = next.run(req, extensions).await;

        let duration = start.elapsed();

        match &result {
            Ok(resp) if !resp.status().is_success() => {
                let status = resp.status();

                // auth failures are reported to the user, no need to shout about them
                match status {
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                        warn!("Request rejected: {} {} - Status: {}, Duration: {:?}", method, url, status, duration)
                    }
                    _ => error!("Request failed: {} {} - Status: {}, Duration: {:?}", method, url, status, duration),
                }
            }
            Err(e) => {
                error!("Request error: {} {} - Error: {}, Duration: {:?}", method, url, e, duration);
            }
            _ => {
                debug!("Request succeeded: {} {} - Duration: {:?}", method, url, duration);
            }
        }

        result
    }
}
