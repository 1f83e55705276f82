use serde_json::Value;
use tracing::{debug, error};

use super::models::{JobPost, JobPostChanges, JobPostInput, NewJobPost};
use super::{decode_rows, Backend, BackendError, Query, JOB_POSTS};

/// Repository for `job_posts` operations
///
/// Reads log failures and fall back to an empty result; writes log and
/// hand the error back to the caller.
pub struct JobPostRepository;

impl JobPostRepository {
    /// Insert one job post owned by `user_id` and return the stored row
    pub async fn create(
        backend: &dyn Backend,
        access_token: &str,
        user_id: &str,
        post: &JobPostInput,
    ) -> Result<JobPost, BackendError> {
        debug!("Creating job post: title={}, user_id={}", post.title, user_id);

        let payload = serde_json::to_value([NewJobPost { user_id, post }])?;
        let rows = backend
            .insert(JOB_POSTS, payload, Some(access_token))
            .await
            .inspect_err(|e| error!("Error creating job post: {}", e))?;

        let row = first_row(rows)?;
        debug!("Job post created with id={}", row.id);
        Ok(row)
    }

    /// Posts owned by `user_id`, newest first
    pub async fn list_for_user(
        backend: &dyn Backend,
        access_token: &str,
        user_id: &str,
    ) -> Vec<JobPost> {
        let query = Query::new().eq("user_id", user_id).order_desc("created_at");
        Self::select_or_empty(backend, &query, Some(access_token), "user job posts").await
    }

    /// Every active post, newest first
    pub async fn list_active(backend: &dyn Backend, access_token: Option<&str>) -> Vec<JobPost> {
        let query = Query::new().eq("is_active", true).order_desc("created_at");
        Self::select_or_empty(backend, &query, access_token, "job posts").await
    }

    pub async fn get(
        backend: &dyn Backend,
        access_token: &str,
        id: &str,
    ) -> Result<Option<JobPost>, BackendError> {
        let rows = backend
            .select(JOB_POSTS, &Query::new().eq("id", id), Some(access_token))
            .await
            .inspect_err(|e| error!("Error fetching job post {}: {}", id, e))?;
        Ok(decode_rows(rows)?.into_iter().next())
    }

    /// Apply `changes` to the post with `id`; no matching row is `NotFound`
    pub async fn update(
        backend: &dyn Backend,
        access_token: &str,
        id: &str,
        changes: &JobPostChanges,
    ) -> Result<JobPost, BackendError> {
        debug!("Updating job post id={}", id);

        let rows = backend
            .update(
                JOB_POSTS,
                &Query::new().eq("id", id),
                serde_json::to_value(changes)?,
                Some(access_token),
            )
            .await
            .inspect_err(|e| error!("Error updating job post: {}", e))?;
        first_row(rows)
    }

    pub async fn delete(
        backend: &dyn Backend,
        access_token: &str,
        id: &str,
    ) -> Result<(), BackendError> {
        debug!("Deleting job post id={}", id);

        backend
            .delete(JOB_POSTS, &Query::new().eq("id", id), Some(access_token))
            .await
            .inspect_err(|e| error!("Error deleting job post: {}", e))
    }

    async fn select_or_empty(
        backend: &dyn Backend,
        query: &Query,
        access_token: Option<&str>,
        what: &str,
    ) -> Vec<JobPost> {
        let rows = match backend.select(JOB_POSTS, query, access_token).await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Error fetching {}: {}", what, e);
                return Vec::new();
            }
        };

        decode_rows(rows).unwrap_or_else(|e| {
            error!("Error decoding {}: {}", what, e);
            Vec::new()
        })
    }
}

fn first_row(rows: Vec<Value>) -> Result<JobPost, BackendError> {
    match rows.into_iter().next() {
        Some(row) => Ok(serde_json::from_value(row)?),
        None => Err(BackendError::NotFound),
    }
}
