use actix_web::{
    get, post,
    web::{Data, Form, Path},
    HttpResponse, ResponseError,
};
use tracing::error;

use crate::api::job_post::{JobPostCard, JobPostForm, JobPostService, ServiceError};
use crate::api::session::{see_other, AuthenticatedUser, SessionUser};
use crate::templates::{render, render_with_status, JobPostFormPage, MyJobPosts};

const LIST_PATH: &str = "/dashboard/job-posts";
const CREATE_PATH: &str = "/dashboard/job-posts/create";

fn email(user: &SessionUser) -> String {
    user.user.email.clone().unwrap_or_default()
}

async fn list_page(
    user: &SessionUser,
    service: &JobPostService,
    error: Option<(ServiceError, &str)>,
) -> HttpResponse {
    let posts = service.list_mine(user).await;
    let page = MyJobPosts {
        email: email(user),
        cards: JobPostCard::cards(&posts, true),
        error: error.as_ref().map(|(_, message)| message.to_string()),
    };
    match error {
        Some((err, _)) => render_with_status(err.status_code(), &page),
        None => render(&page),
    }
}

/// Re-render the form with the entered values and the failure message
fn form_error(
    user: &SessionUser,
    form: JobPostForm,
    action: String,
    editing: bool,
    err: ServiceError,
) -> HttpResponse {
    render_with_status(
        err.status_code(),
        &JobPostFormPage {
            email: email(user),
            form,
            error: Some(err.to_string()),
            action,
            editing,
        },
    )
}

#[get("/job-posts")]
async fn list(user: AuthenticatedUser, service: Data<JobPostService>) -> HttpResponse {
    list_page(&user, &service, None).await
}

#[get("/job-posts/create")]
async fn new_form(user: AuthenticatedUser) -> HttpResponse {
    render(&JobPostFormPage {
        email: email(&user),
        form: JobPostForm::default(),
        error: None,
        action: CREATE_PATH.to_string(),
        editing: false,
    })
}

#[post("/job-posts/create")]
async fn create(
    user: AuthenticatedUser,
    service: Data<JobPostService>,
    form: Form<JobPostForm>,
) -> HttpResponse {
    match service.create_from_form(&user, &form).await {
        Ok(_) => see_other(LIST_PATH),
        Err(err) => form_error(&user, form.into_inner(), CREATE_PATH.to_string(), false, err),
    }
}

#[get("/job-posts/{id}/edit")]
async fn edit_form(
    user: AuthenticatedUser,
    service: Data<JobPostService>,
    path: Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    match service.get(&user, &id).await {
        Ok(post) => render(&JobPostFormPage {
            email: email(&user),
            form: JobPostForm::from_post(&post),
            error: None,
            action: format!("{LIST_PATH}/{id}/edit"),
            editing: true,
        }),
        Err(err) => {
            error!("Cannot edit job post {}: {}", id, err);
            list_page(&user, &service, Some((err, "Job post not found"))).await
        }
    }
}

#[post("/job-posts/{id}/edit")]
async fn update(
    user: AuthenticatedUser,
    service: Data<JobPostService>,
    path: Path<String>,
    form: Form<JobPostForm>,
) -> HttpResponse {
    let id = path.into_inner();
    match service.update_from_form(&user, &id, &form).await {
        Ok(_) => see_other(LIST_PATH),
        Err(err) => {
            let action = format!("{LIST_PATH}/{id}/edit");
            form_error(&user, form.into_inner(), action, true, err)
        }
    }
}

/// The post leaves the list only once the backend confirmed the delete;
/// on failure the list is shown again, post included, with an error.
#[post("/job-posts/{id}/delete")]
async fn delete(
    user: AuthenticatedUser,
    service: Data<JobPostService>,
    path: Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    match service.delete(&user, &id).await {
        Ok(()) => see_other(LIST_PATH),
        Err(err) => {
            error!("Failed to delete job post {}: {}", id, err);
            list_page(&user, &service, Some((err, "Failed to delete job post"))).await
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{
        http::{header, StatusCode},
        test, App,
    };
    use serde_json::json;

    use crate::api::testing::{install, session_cookie, signed_in_backend};
    use crate::backend::{Query, JOB_POSTS};

    fn own_post(id: &str, title: &str, created_at: &str) -> serde_json::Value {
        json!({
            "id": id,
            "user_id": "user-1",
            "title": title,
            "company_name": "Acme",
            "description": "d",
            "location": "Remote",
            "job_type": "full-time",
            "requirements": ["Rust"],
            "created_at": created_at,
        })
    }

    #[actix_web::test]
    async fn create_inserts_once_with_split_lists() {
        let backend = signed_in_backend();
        let app =
            test::init_service(App::new().configure(|cfg| install(cfg, backend.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/dashboard/job-posts/create")
            .cookie(session_cookie())
            .set_form([
                ("title", "Senior Frontend Developer"),
                ("company_name", "Tech Corp"),
                ("description", "Build the UI"),
                ("location", "New York, NY"),
                ("job_type", "part-time"),
                ("salary_range", ""),
                ("requirements", "React\n\nTypeScript\n  \nTesting"),
                ("benefits", "Remote\nEquity"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/dashboard/job-posts");

        let inserts = backend.inserts(JOB_POSTS);
        assert_eq!(inserts.len(), 1);
        assert_eq!(
            inserts[0],
            json!([{
                "user_id": "user-1",
                "title": "Senior Frontend Developer",
                "company_name": "Tech Corp",
                "description": "Build the UI",
                "location": "New York, NY",
                "job_type": "part-time",
                "salary_range": null,
                "requirements": ["React", "TypeScript", "Testing"],
                "benefits": ["Remote", "Equity"],
            }])
        );
    }

    #[actix_web::test]
    async fn missing_required_field_rerenders_the_form() {
        let backend = signed_in_backend();
        let app =
            test::init_service(App::new().configure(|cfg| install(cfg, backend.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/dashboard/job-posts/create")
            .cookie(session_cookie())
            .set_form([("title", "Designer"), ("company_name", "Studio"), ("location", "Lisbon")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Job description is required"));
        assert!(body.contains("value=\"Designer\""));
        assert!(backend.inserts(JOB_POSTS).is_empty());
    }

    #[actix_web::test]
    async fn backend_error_is_shown_verbatim() {
        let backend = signed_in_backend();
        backend.fail_writes("new row violates row-level security policy for table \"job_posts\"");
        let app =
            test::init_service(App::new().configure(|cfg| install(cfg, backend.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/dashboard/job-posts/create")
            .cookie(session_cookie())
            .set_form([
                ("title", "t"),
                ("company_name", "c"),
                ("description", "d"),
                ("location", "l"),
            ])
            .to_request();
        let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

        assert!(body.contains("new row violates row-level security policy"));
    }

    #[actix_web::test]
    async fn list_shows_own_posts_with_actions() {
        let backend = signed_in_backend();
        backend.seed(JOB_POSTS, own_post("p-1", "Platform Engineer", "2024-01-01T00:00:00+00:00"));
        backend.seed(
            JOB_POSTS,
            json!({
                "id": "p-9",
                "user_id": "other",
                "title": "Not Mine",
                "company_name": "X",
                "description": "d",
                "location": "l",
                "job_type": "contract",
            }),
        );
        let app =
            test::init_service(App::new().configure(|cfg| install(cfg, backend.clone()))).await;

        let req = test::TestRequest::get()
            .uri("/dashboard/job-posts")
            .cookie(session_cookie())
            .to_request();
        let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();

        assert!(body.contains("Platform Engineer"));
        assert!(!body.contains("Not Mine"));
        assert!(body.contains(">Delete</button>"));
    }

    #[actix_web::test]
    async fn delete_removes_the_post_after_backend_success() {
        let backend = signed_in_backend();
        backend.seed(JOB_POSTS, own_post("p-1", "Keep Me", "2024-01-01T00:00:00+00:00"));
        backend.seed(JOB_POSTS, own_post("p-2", "Delete Me", "2024-02-01T00:00:00+00:00"));
        let app =
            test::init_service(App::new().configure(|cfg| install(cfg, backend.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/dashboard/job-posts/p-2/delete")
            .cookie(session_cookie())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(backend.deletes(JOB_POSTS), [Query::new().eq("id", "p-2")]);

        let req = test::TestRequest::get()
            .uri("/dashboard/job-posts")
            .cookie(session_cookie())
            .to_request();
        let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
        assert!(body.contains("Keep Me"));
        assert!(!body.contains("Delete Me"));
    }

    #[actix_web::test]
    async fn failed_delete_keeps_the_post_listed() {
        let backend = signed_in_backend();
        backend.seed(JOB_POSTS, own_post("p-1", "Still Here", "2024-01-01T00:00:00+00:00"));
        backend.fail_writes("permission denied");
        let app =
            test::init_service(App::new().configure(|cfg| install(cfg, backend.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/dashboard/job-posts/p-1/delete")
            .cookie(session_cookie())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_ne!(resp.status(), StatusCode::SEE_OTHER);

        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Failed to delete job post"));
        assert!(body.contains("Still Here"));
    }

    #[actix_web::test]
    async fn edit_prefills_and_update_applies_changes() {
        let backend = signed_in_backend();
        backend.seed(JOB_POSTS, own_post("p-1", "Old Title", "2024-01-01T00:00:00+00:00"));
        let app =
            test::init_service(App::new().configure(|cfg| install(cfg, backend.clone()))).await;

        let req = test::TestRequest::get()
            .uri("/dashboard/job-posts/p-1/edit")
            .cookie(session_cookie())
            .to_request();
        let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
        assert!(body.contains("value=\"Old Title\""));
        assert!(body.contains("Save Changes"));

        let req = test::TestRequest::post()
            .uri("/dashboard/job-posts/p-1/edit")
            .cookie(session_cookie())
            .set_form([
                ("title", "New Title"),
                ("company_name", "Acme"),
                ("description", "d"),
                ("location", "Remote"),
                ("job_type", "contract"),
                ("requirements", "Rust\nTokio"),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);

        let row = &backend.rows(JOB_POSTS)[0];
        assert_eq!(row["title"], "New Title");
        assert_eq!(row["job_type"], "contract");
        assert_eq!(row["requirements"], json!(["Rust", "Tokio"]));
        assert_eq!(row["is_active"], false);
    }

    #[actix_web::test]
    async fn editing_someone_elses_post_is_not_found() {
        let backend = signed_in_backend();
        backend.seed(
            JOB_POSTS,
            json!({
                "id": "p-9",
                "user_id": "other",
                "title": "Theirs",
                "company_name": "X",
                "description": "d",
                "location": "l",
                "job_type": "contract",
            }),
        );
        let app =
            test::init_service(App::new().configure(|cfg| install(cfg, backend.clone()))).await;

        let req = test::TestRequest::get()
            .uri("/dashboard/job-posts/p-9/edit")
            .cookie(session_cookie())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
