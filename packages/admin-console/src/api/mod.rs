//! REST collaborator for the admin API.
//!
//! The console never talks HTTP directly. Stores and the dispatcher go through
//! [`BaseAdminApi`], which keeps them testable against [`crate::testing::MockAdminApi`].

mod client;

pub use client::HttpAdminApi;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ApiResult;

/// HTTP verb of a mutating call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MutationMethod {
    Patch,
    Post,
}

/// A fully-built mutating request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationRequest {
    pub method: MutationMethod,
    pub path: String,
    pub body: serde_json::Value,
}

#[async_trait]
pub trait BaseAdminApi: Send + Sync {
    /// `GET` a path relative to the admin base URL with query parameters.
    async fn get(&self, path: &str, params: &[(String, String)]) -> ApiResult<serde_json::Value>;

    /// Send a `PATCH` or `POST` with a JSON body.
    async fn mutate(&self, request: &MutationRequest) -> ApiResult<serde_json::Value>;
}
