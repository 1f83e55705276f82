use actix_web::{http::StatusCode, HttpResponse};
use askama::Template;
use tracing::error;

use crate::api::job_post::{JobBoardStats, JobPostCard, JobPostForm};

#[derive(Template)]
#[template(path = "landing.html")]
pub struct Landing;

#[derive(Template)]
#[template(path = "home.html")]
pub struct Home {
    pub email: String,
    pub display_name: String,
    pub member_since: Option<String>,
}

#[derive(Template)]
#[template(path = "jobs.html")]
pub struct JobBoard {
    pub signed_in: bool,
    pub stats: JobBoardStats,
    pub cards: Vec<JobPostCard>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct Dashboard {
    pub email: String,
    pub user_id: String,
    pub created: Option<String>,
    /// `None` when the user has no profile row
    pub full_name: Option<String>,
}

#[derive(Template)]
#[template(path = "job_posts.html")]
pub struct MyJobPosts {
    pub email: String,
    pub cards: Vec<JobPostCard>,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "job_post_form.html")]
pub struct JobPostFormPage {
    pub email: String,
    pub form: JobPostForm,
    pub error: Option<String>,
    pub action: String,
    pub editing: bool,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct Login {
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Template)]
#[template(path = "auth_error.html")]
pub struct AuthCodeError;

/// Render `template` as an HTML response with the given status
pub fn render_with_status<T: Template>(status: StatusCode, template: &T) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!("Failed to render template: {}", e);
            HttpResponse::InternalServerError().body("Failed to render page")
        }
    }
}

pub fn render<T: Template>(template: &T) -> HttpResponse {
    render_with_status(StatusCode::OK, template)
}
