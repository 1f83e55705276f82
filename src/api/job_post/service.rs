use std::sync::Arc;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::{error, info, warn};
use validator::Validate;

use super::models::JobPostForm;
use crate::api::session::SessionUser;
use crate::api::validation::{summary, ErrorResponse};
use crate::backend::job_posts::JobPostRepository;
use crate::backend::models::{JobPost, JobPostChanges, JobPostInput};
use crate::backend::{Backend, BackendError};

/// Service-level errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Backend rejected or failed the call; displays the backend's message
    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("{0}")]
    Validation(String),

    #[error("Job post not found: {0}")]
    NotFound(String),

    #[error("User not authenticated")]
    Unauthenticated,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Backend(BackendError::Api { status, .. })
                if (400..500).contains(status) =>
            {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            ServiceError::Backend(BackendError::NotFound) | ServiceError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::Backend(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ServiceError::Backend(e) => {
                error!("Backend error: {}", e);
                "Backend request failed"
            }
            ServiceError::Validation(msg) => {
                warn!("Validation error: {}", msg);
                "Validation failed"
            }
            ServiceError::NotFound(id) => {
                warn!("Job post not found: {}", id);
                "Not found"
            }
            ServiceError::Unauthenticated => "Unauthorized",
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error.to_string(),
            fields: serde_json::json!({ "message": self.to_string() }),
        })
    }
}

/// Job post operations on behalf of a signed-in user
pub struct JobPostService {
    backend: Arc<dyn Backend>,
}

impl JobPostService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Active posts for the public board, newest first
    pub async fn list_active(&self) -> Vec<JobPost> {
        JobPostRepository::list_active(self.backend.as_ref(), None).await
    }

    /// The caller's own posts, newest first
    pub async fn list_mine(&self, user: &SessionUser) -> Vec<JobPost> {
        JobPostRepository::list_for_user(self.backend.as_ref(), &user.access_token, &user.user.id)
            .await
    }

    pub async fn get(&self, user: &SessionUser, id: &str) -> Result<JobPost, ServiceError> {
        JobPostRepository::get(self.backend.as_ref(), &user.access_token, id)
            .await?
            .filter(|post| post.user_id == user.user.id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Create a single job post
    ///
    /// # Business Logic
    /// - Required fields must be non-blank
    /// - The owner is the caller, never a client-supplied value
    /// - Exactly one insert reaches the backend
    pub async fn create(
        &self,
        user: &SessionUser,
        input: &JobPostInput,
    ) -> Result<JobPost, ServiceError> {
        input
            .validate()
            .map_err(|errors| ServiceError::Validation(summary(&errors)))?;

        info!("Service: Creating job post title={} for user={}", input.title, user.user.id);
        let post = JobPostRepository::create(
            self.backend.as_ref(),
            &user.access_token,
            &user.user.id,
            input,
        )
        .await?;
        info!("Service: Job post created with id={}", post.id);
        Ok(post)
    }

    pub async fn create_from_form(
        &self,
        user: &SessionUser,
        form: &JobPostForm,
    ) -> Result<JobPost, ServiceError> {
        self.create(user, &form.to_input()).await
    }

    pub async fn update(
        &self,
        user: &SessionUser,
        id: &str,
        changes: &JobPostChanges,
    ) -> Result<JobPost, ServiceError> {
        changes
            .validate()
            .map_err(|errors| ServiceError::Validation(summary(&errors)))?;
        if changes.is_empty() {
            return Err(ServiceError::Validation("No changes supplied".to_string()));
        }

        info!("Service: Updating job post id={} for user={}", id, user.user.id);
        JobPostRepository::update(self.backend.as_ref(), &user.access_token, id, changes)
            .await
            .map_err(|e| match e {
                BackendError::NotFound => ServiceError::NotFound(id.to_string()),
                other => other.into(),
            })
    }

    pub async fn update_from_form(
        &self,
        user: &SessionUser,
        id: &str,
        form: &JobPostForm,
    ) -> Result<JobPost, ServiceError> {
        self.update(user, id, &form.to_changes()).await
    }

    pub async fn delete(&self, user: &SessionUser, id: &str) -> Result<(), ServiceError> {
        info!("Service: Deleting job post id={} for user={}", id, user.user.id);
        JobPostRepository::delete(self.backend.as_ref(), &user.access_token, id).await?;
        Ok(())
    }
}
