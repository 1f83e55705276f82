use actix_web::{
    delete, get, patch, post,
    web::{self, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;

use super::dto::{JobPostListResponse, JobPostResponse, MessageResponse};
use super::service::{JobPostService, ServiceError};
use crate::api::session::ApiUser;
use crate::backend::models::{JobPostChanges, JobPostInput};

#[get("")]
async fn list_active(service: Data<JobPostService>) -> HttpResponse {
    let job_posts = service.list_active().await;
    HttpResponse::Ok().json(JobPostListResponse {
        count: job_posts.len(),
        job_posts,
    })
}

#[get("/mine")]
async fn list_mine(user: ApiUser, service: Data<JobPostService>) -> HttpResponse {
    let job_posts = service.list_mine(&user).await;
    HttpResponse::Ok().json(JobPostListResponse {
        count: job_posts.len(),
        job_posts,
    })
}

#[post("")]
async fn create_job_post(
    user: ApiUser,
    service: Data<JobPostService>,
    input: Json<JobPostInput>,
) -> Result<HttpResponse, ServiceError> {
    let job_post = service.create(&user, &input).await?;
    Ok(HttpResponse::Created().json(JobPostResponse {
        message: "Job post created successfully".to_string(),
        job_post,
    }))
}

#[patch("/{id}")]
async fn update_job_post(
    user: ApiUser,
    service: Data<JobPostService>,
    path: Path<String>,
    changes: Json<JobPostChanges>,
) -> Result<HttpResponse, ServiceError> {
    let job_post = service.update(&user, &path, &changes).await?;
    Ok(HttpResponse::Ok().json(JobPostResponse {
        message: "Job post updated successfully".to_string(),
        job_post,
    }))
}

#[delete("/{id}")]
async fn delete_job_post(
    user: ApiUser,
    service: Data<JobPostService>,
    path: Path<String>,
) -> Result<HttpResponse, ServiceError> {
    service.delete(&user, &path).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Job post deleted successfully".to_string(),
    }))
}

pub fn job_post_config(config: &mut ServiceConfig) {
    config.service(
        web::scope("/api/job-posts")
            .service(list_active)
            .service(list_mine)
            .service(create_job_post)
            .service(update_job_post)
            .service(delete_job_post),
    );
}
