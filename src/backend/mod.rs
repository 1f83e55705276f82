//! Thin client for the hosted backend (auth + table API).
//!
//! Everything that touches persisted data or user identity goes through the
//! [`Backend`] trait. Production uses [`SupabaseClient`]; tests swap in the
//! in-memory implementation from `memory`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod client;
pub mod job_posts;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod profiles;

pub use client::SupabaseClient;
use models::{AuthUser, Session};

pub const JOB_POSTS: &str = "job_posts";
pub const PROFILES: &str = "profiles";

/// Errors raised while talking to the backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success answer; `message` is the backend's own wording
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected backend payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Record not found")]
    NotFound,
}

impl BackendError {
    /// True when the backend rejected the caller's credentials
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, BackendError::Api { status: 401 | 403, .. })
    }
}

/// Equality filters plus an optional ordering, rendered as table API
/// query parameters (`col=eq.value`, `order=col.desc`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some((column.to_string(), true));
        self
    }

    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    /// `(column, descending)`
    pub fn order(&self) -> Option<(&str, bool)> {
        self.order.as_ref().map(|(column, desc)| (column.as_str(), *desc))
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(
            self.filters()
                .iter()
                .map(|(column, value)| (column.clone(), format!("eq.{value}"))),
        );
        if let Some((column, desc)) = self.order() {
            let direction = if desc { "desc" } else { "asc" };
            pairs.push(("order".to_string(), format!("{column}.{direction}")));
        }
        pairs
    }
}

/// Operations offered by the backend-as-a-service.
///
/// Table calls take the caller's access token so the backend's row level
/// security applies; `None` means an anonymous request.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, BackendError>;

    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<Session, BackendError>;

    /// `None` when the account still has to be confirmed by e-mail
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, BackendError>;

    async fn verify_otp(&self, token_hash: &str, kind: &str) -> Result<Session, BackendError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    async fn health(&self) -> Result<(), BackendError>;

    async fn select(
        &self,
        table: &str,
        query: &Query,
        access_token: Option<&str>,
    ) -> Result<Vec<Value>, BackendError>;

    async fn insert(
        &self,
        table: &str,
        rows: Value,
        access_token: Option<&str>,
    ) -> Result<Vec<Value>, BackendError>;

    async fn update(
        &self,
        table: &str,
        query: &Query,
        changes: Value,
        access_token: Option<&str>,
    ) -> Result<Vec<Value>, BackendError>;

    async fn delete(
        &self,
        table: &str,
        query: &Query,
        access_token: Option<&str>,
    ) -> Result<(), BackendError>;
}

/// Decode raw rows into typed records
pub fn decode_rows<T: serde::de::DeserializeOwned>(
    rows: Vec<Value>,
) -> Result<Vec<T>, BackendError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(BackendError::from))
        .collect()
}
