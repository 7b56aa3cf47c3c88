//! Content gateway
//!
//! Blog and media content lives in a separate backend. The gateway forwards reads, attaches
//! credentials to writes and coerces payloads into the shapes clients expect.

use async_trait::async_trait;
use bytes::Bytes;
use mockall::automock;
use serde_json::Value;

mod client;
mod errors;
pub mod normalize;

pub use client::*;
pub use errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMethod {
    Post,
    Put,
    Delete,
}

/// Credentials presented by the caller of a write route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteAuth {
    /// Bearer token from the `auth_token` cookie or `Authorization` header.
    pub token: Option<String>,

    /// Whether the route may fall back to the configured media API key.
    pub allow_api_key: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    ApiKey(String),
}

/// Binary content proxied from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub content_type: String,
    pub body: Bytes,
}

#[automock]
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// `GET` a JSON document, forwarding query parameters verbatim.
    async fn fetch_json(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Value, GatewayError>;

    /// Send an authenticated JSON write.
    async fn write_json(
        &self,
        method: WriteMethod,
        path: &str,
        auth: WriteAuth,
        body: Option<Value>,
    ) -> Result<Value, GatewayError>;

    /// Forward a raw request body (e.g. multipart form data) with its content type.
    async fn upload(
        &self,
        path: &str,
        auth: WriteAuth,
        content_type: String,
        body: Bytes,
    ) -> Result<Value, GatewayError>;

    /// Resolve the credential a write would present, without contacting the backend.
    fn credential(&self, auth: &WriteAuth) -> Result<Credential, GatewayError>;

    /// Fetch a binary asset relative to the backend origin.
    async fn fetch_asset(&self, path: &str) -> Result<Asset, GatewayError>;
}
