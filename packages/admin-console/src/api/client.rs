//! reqwest-backed admin API client

use async_trait::async_trait;
use reqwest::Response;
use tracing::debug;

use super::{BaseAdminApi, MutationMethod, MutationRequest};
use crate::config::ConsoleConfig;
use crate::error::{ApiError, ApiResult};

/// Admin API client talking JSON over HTTP.
///
/// The bearer token is handed in by the auth collaborator; this client only
/// attaches it.
#[derive(Clone)]
pub struct HttpAdminApi {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpAdminApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        let client = Self::new(config.api_url.clone());
        match &config.api_token {
            Some(token) => client.with_token(token.clone()),
            None => client,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn read_json(resp: Response) -> ApiResult<serde_json::Value> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        // 204 and empty 200 bodies are valid for mutations
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl BaseAdminApi for HttpAdminApi {
    async fn get(&self, path: &str, params: &[(String, String)]) -> ApiResult<serde_json::Value> {
        debug!(path, params = params.len(), "GET");

        let req = self.client.get(self.url(path)).query(params);
        let resp = self.authorize(req).send().await?;
        Self::read_json(resp).await
    }

    async fn mutate(&self, request: &MutationRequest) -> ApiResult<serde_json::Value> {
        debug!(path = %request.path, method = ?request.method, "Mutation");

        let url = self.url(&request.path);
        let req = match request.method {
            MutationMethod::Patch => self.client.patch(url),
            MutationMethod::Post => self.client.post(url),
        };
        let resp = self.authorize(req.json(&request.body)).send().await?;
        Self::read_json(resp).await
    }
}
