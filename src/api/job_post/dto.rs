use serde::Serialize;

use crate::backend::models::JobPost;

/// Response for single job post creation or update
#[derive(Serialize)]
pub struct JobPostResponse {
    pub message: String,
    pub job_post: JobPost,
}

#[derive(Serialize)]
pub struct JobPostListResponse {
    pub count: usize,
    pub job_posts: Vec<JobPost>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
