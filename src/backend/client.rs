use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use super::models::{AuthUser, Session};
use super::{Backend, BackendError, Query};

/// Backend client speaking the Supabase auth (`/auth/v1`) and table
/// (`/rest/v1`) HTTP APIs.
///
/// Holds a single pooled `reqwest::Client`; cloning is cheap.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Create a client for the project at `base_url`
    ///
    /// # Parameters
    /// - `base_url`: project URL, e.g. `https://xyzcompany.supabase.co`
    /// - `anon_key`: public anon key sent as `apikey` on every request
    /// - `timeout`: per-request timeout
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, url: String, access_token: Option<&str>) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
    }

    async fn send(builder: RequestBuilder) -> Result<Vec<u8>, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("Backend responded with status={} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(body.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, BackendError> {
        let body = Self::send(builder).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Build an error from a non-success response, keeping the backend's
/// message as-is
fn api_error(status: u16, body: &[u8]) -> BackendError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .or_else(|| {
            let text = String::from_utf8_lossy(body).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| format!("Backend request failed with status {status}"));

    BackendError::Api { status, message }
}

#[async_trait]
impl Backend for SupabaseClient {
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        let request = self.request(Method::GET, self.auth_url("user"), Some(access_token));
        Self::send_json(request).await
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        debug!("Signing in email={}", email);
        let request = self
            .request(Method::POST, self.auth_url("token"), None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        Self::send_json(request).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, BackendError> {
        debug!("Signing up email={}", email);
        let request = self
            .request(Method::POST, self.auth_url("signup"), None)
            .json(&json!({ "email": email, "password": password }));
        let body: Value = Self::send_json(request).await?;

        // With e-mail confirmation enabled only the user object comes back
        if body.get("access_token").is_some() {
            Ok(Some(serde_json::from_value(body)?))
        } else {
            Ok(None)
        }
    }

    async fn verify_otp(&self, token_hash: &str, kind: &str) -> Result<Session, BackendError> {
        let request = self
            .request(Method::POST, self.auth_url("verify"), None)
            .json(&json!({ "type": kind, "token_hash": token_hash }));
        Self::send_json(request).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let request = self.request(Method::POST, self.auth_url("logout"), Some(access_token));
        Self::send(request).await.map(|_| ())
    }

    async fn health(&self) -> Result<(), BackendError> {
        let request = self.request(Method::GET, self.auth_url("health"), None);
        Self::send(request).await.map(|_| ())
    }

    async fn select(
        &self,
        table: &str,
        query: &Query,
        access_token: Option<&str>,
    ) -> Result<Vec<Value>, BackendError> {
        let request = self
            .request(Method::GET, self.rest_url(table), access_token)
            .query(&query.to_pairs());
        Self::send_json(request).await
    }

    async fn insert(
        &self,
        table: &str,
        rows: Value,
        access_token: Option<&str>,
    ) -> Result<Vec<Value>, BackendError> {
        let request = self
            .request(Method::POST, self.rest_url(table), access_token)
            .header("Prefer", "return=representation")
            .json(&rows);
        Self::send_json(request).await
    }

    async fn update(
        &self,
        table: &str,
        query: &Query,
        changes: Value,
        access_token: Option<&str>,
    ) -> Result<Vec<Value>, BackendError> {
        let request = self
            .request(Method::PATCH, self.rest_url(table), access_token)
            .query(&query.to_pairs())
            .header("Prefer", "return=representation")
            .json(&changes);
        Self::send_json(request).await
    }

    async fn delete(
        &self,
        table: &str,
        query: &Query,
        access_token: Option<&str>,
    ) -> Result<(), BackendError> {
        let request = self
            .request(Method::DELETE, self.rest_url(table), access_token)
            .query(&query.to_pairs());
        Self::send(request).await.map(|_| ())
    }
}
