//! HTTP client for the content backend.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    Client, Method, RequestBuilder, Response,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::gateway::{
    Asset, ContentGateway, Credential, GatewayError, WriteAuth, WriteMethod, normalize::normalize,
};

const DEFAULT_ASSET_CONTENT_TYPE: &str = "image/png";

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend origin, with or without a trailing `/api`.
    pub base_url: String,

    /// Service key used for uploads when the caller has no bearer token.
    pub media_api_key: Option<String>,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// Strip trailing slashes and a trailing `/api` segment so paths can always be written as
/// `/api/...`.
#[must_use]
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');

    trimmed
        .strip_suffix("/api")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_string()
}

/// Pick the credential for a write, or fail without contacting the backend.
///
/// # Errors
///
/// Returns [`GatewayError::Unauthenticated`] when there is no token and no usable API key.
pub fn resolve_credential(
    auth: &WriteAuth,
    api_key: Option<&str>,
) -> Result<Credential, GatewayError> {
    if let Some(token) = auth.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(Credential::Bearer(token.to_string()));
    }

    match api_key.filter(|key| auth.allow_api_key && !key.is_empty()) {
        Some(key) => Ok(Credential::ApiKey(key.to_string())),
        None => Err(GatewayError::Unauthenticated),
    }
}

/// Reject traversal and empty segments in proxied asset paths.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidPath`] for empty paths, empty segments and `..`.
pub fn validate_asset_path(path: &str) -> Result<&str, GatewayError> {
    let path = path.trim_start_matches('/');

    if path.is_empty()
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(GatewayError::InvalidPath);
    }

    Ok(path)
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// [`ContentGateway`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpContentGateway {
    base_url: String,
    media_api_key: Option<String>,
    http: Client,
}

impl HttpContentGateway {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: normalize_base_url(&config.base_url),
            media_api_key: config.media_api_key,
            http,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder, auth: &WriteAuth) -> Result<RequestBuilder, GatewayError> {
        Ok(
            match self.credential(auth)? {
                Credential::Bearer(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
                Credential::ApiKey(key) => request.header("X-API-Key", key),
            },
        )
    }

    async fn read_json(response: Response) -> Result<Value, GatewayError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.json::<ErrorBody>().await.ok();

            debug!(status = status.as_u16(), "upstream returned an error");

            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                message: body.and_then(|body| body.error.or(body.message)),
            });
        }

        let mut payload: Value = response.json().await?;

        normalize(&mut payload);

        Ok(payload)
    }
}

#[async_trait]
impl ContentGateway for HttpContentGateway {
    async fn fetch_json(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Value, GatewayError> {
        let response = self.http.get(self.url(path)).query(&query).send().await?;

        Self::read_json(response).await
    }

    async fn write_json(
        &self,
        method: WriteMethod,
        path: &str,
        auth: WriteAuth,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        let method = match method {
            WriteMethod::Post => Method::POST,
            WriteMethod::Put => Method::PUT,
            WriteMethod::Delete => Method::DELETE,
        };

        let mut request = self.authorize(self.http.request(method, self.url(path)), &auth)?;

        if let Some(body) = &body {
            request = request.json(body);
        }

        Self::read_json(request.send().await?).await
    }

    async fn upload(
        &self,
        path: &str,
        auth: WriteAuth,
        content_type: String,
        body: Bytes,
    ) -> Result<Value, GatewayError> {
        let request = self
            .authorize(self.http.post(self.url(path)), &auth)?
            .header(CONTENT_TYPE, content_type)
            .body(body);

        Self::read_json(request.send().await?).await
    }

    fn credential(&self, auth: &WriteAuth) -> Result<Credential, GatewayError> {
        resolve_credential(auth, self.media_api_key.as_deref())
    }

    async fn fetch_asset(&self, path: &str) -> Result<Asset, GatewayError> {
        let path = validate_asset_path(path)?;

        let response = self.http.get(self.url(path)).send().await?;

        if !response.status().is_success() {
            return Err(GatewayError::AssetNotFound);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(DEFAULT_ASSET_CONTENT_TYPE)
            .to_string();

        Ok(Asset {
            content_type,
            body: response.bytes().await?,
        })
    }
}
