//! [`NetAppApi`] over the ARM REST endpoint
//!
//! Token acquisition is not handled here: the client sends whatever bearer
//! token it was given.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::{CoreError, Result};
use crate::netapp::api::NetAppApi;
use crate::netapp::models::{CapacityPool, NetAppAccount, PoolChangeRequest, Volume};
use crate::resource::{ResourceHandle, ResourceKind};

/// Public Azure Resource Manager endpoint
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";

/// API version the request bodies are written against
pub const DEFAULT_API_VERSION: &str = "2019-11-01";

/// HTTP client for the NetApp Files management API
#[derive(Clone)]
pub struct RestClient {
    endpoint: String,
    api_version: String,
    token: Option<String>,
    client: Client,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl RestClient {
    /// Create a client for `endpoint`
    ///
    /// Trailing slashes are trimmed; anything that is not an absolute URL is
    /// rejected.
    pub fn new(endpoint: &str, api_version: &str, token: Option<String>) -> Result<Self> {
        Self::with_client(endpoint, api_version, token, Client::new())
    }

    /// Create a client with a preconfigured [`reqwest::Client`]
    pub fn with_client(
        endpoint: &str,
        api_version: &str,
        token: Option<String>,
        client: Client,
    ) -> Result<Self> {
        Url::parse(endpoint)
            .map_err(|e| CoreError::Validation(format!("invalid endpoint '{endpoint}': {e}")))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
            token,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn url(&self, id: &ResourceHandle, action: Option<&str>) -> String {
        let path = match action {
            Some(action) => format!("{}/{}", id.as_str(), action),
            None => id.as_str().to_string(),
        };
        format!("{}{}?api-version={}", self.endpoint, path, self.api_version)
    }

    fn request(&self, method: Method, id: &ResourceHandle, action: Option<&str>) -> RequestBuilder {
        let url = self.url(id, action);
        debug!(%method, %url, "Sending management request");

        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, id: &ResourceHandle, kind: ResourceKind) -> Result<T> {
        id.expect_kind(kind)?;
        let response = self.request(Method::GET, id, None).send().await?;
        Self::handle_response(id, response).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        id: &ResourceHandle,
        kind: ResourceKind,
        body: &B,
    ) -> Result<T> {
        id.expect_kind(kind)?;
        let response = self.request(Method::PUT, id, None).json(body).send().await?;
        Self::handle_response(id, response).await
    }

    async fn delete(&self, id: &ResourceHandle, kind: ResourceKind) -> Result<()> {
        id.expect_kind(kind)?;
        let response = self.request(Method::DELETE, id, None).send().await?;
        Self::handle_empty_response(id, response).await
    }

    /// Check the status code and decode the JSON body
    async fn handle_response<T: DeserializeOwned>(
        id: &ResourceHandle,
        response: Response,
    ) -> Result<T> {
        let response = Self::check_status(id, response).await?;
        let bytes = response.bytes().await?;
        trace!(resource = %id, body = %String::from_utf8_lossy(&bytes), "Response body");
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Check the status code of a response whose body is not needed
    async fn handle_empty_response(id: &ResourceHandle, response: Response) -> Result<()> {
        Self::check_status(id, response).await?;
        Ok(())
    }

    async fn check_status(id: &ResourceHandle, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        debug!(resource = %id, status = status.as_u16(), "Management request failed");
        Err(CoreError::from_status(
            status.as_u16(),
            &id.describe(),
            message,
        ))
    }
}

#[async_trait]
impl NetAppApi for RestClient {
    async fn create_or_update_account(
        &self,
        id: &ResourceHandle,
        body: &NetAppAccount,
    ) -> Result<NetAppAccount> {
        self.put(id, ResourceKind::Account, body).await
    }

    async fn get_account(&self, id: &ResourceHandle) -> Result<NetAppAccount> {
        self.get(id, ResourceKind::Account).await
    }

    async fn delete_account(&self, id: &ResourceHandle) -> Result<()> {
        self.delete(id, ResourceKind::Account).await
    }

    async fn create_or_update_pool(
        &self,
        id: &ResourceHandle,
        body: &CapacityPool,
    ) -> Result<CapacityPool> {
        self.put(id, ResourceKind::Pool, body).await
    }

    async fn get_pool(&self, id: &ResourceHandle) -> Result<CapacityPool> {
        self.get(id, ResourceKind::Pool).await
    }

    async fn delete_pool(&self, id: &ResourceHandle) -> Result<()> {
        self.delete(id, ResourceKind::Pool).await
    }

    async fn create_or_update_volume(&self, id: &ResourceHandle, body: &Volume) -> Result<Volume> {
        self.put(id, ResourceKind::Volume, body).await
    }

    async fn get_volume(&self, id: &ResourceHandle) -> Result<Volume> {
        self.get(id, ResourceKind::Volume).await
    }

    async fn delete_volume(&self, id: &ResourceHandle) -> Result<()> {
        self.delete(id, ResourceKind::Volume).await
    }

    async fn pool_change(
        &self,
        volume: &ResourceHandle,
        request: &PoolChangeRequest,
    ) -> Result<()> {
        volume.expect_kind(ResourceKind::Volume)?;
        let response = self
            .request(Method::POST, volume, Some("poolChange"))
            .json(request)
            .send()
            .await?;
        Self::handle_empty_response(volume, response).await
    }
}
