use actix_web::{get, web::Data, HttpRequest, HttpResponse};

use crate::api::job_post::{JobBoardStats, JobPostCard, JobPostService};
use crate::api::session::access_token;
use crate::templates::{render, JobBoard};

/// Public job board: every active post, newest first, with headline counts
#[get("/jobs")]
async fn job_board(req: HttpRequest, service: Data<JobPostService>) -> HttpResponse {
    let posts = service.list_active().await;

    render(&JobBoard {
        signed_in: access_token(&req).is_some(),
        stats: JobBoardStats::from_posts(&posts),
        cards: JobPostCard::cards(&posts, false),
    })
}
