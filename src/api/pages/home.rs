use actix_web::{get, web::Data, HttpRequest, HttpResponse};
use tracing::error;

use super::short_date;
use crate::api::session::current_user;
use crate::api::state::AppState;
use crate::templates::{render, Home, Landing};

/// Signed-in home when a session resolves, landing page otherwise
#[get("/")]
async fn home(req: HttpRequest, state: Data<AppState>) -> HttpResponse {
    match current_user(&state, &req).await {
        Ok(Some(session)) => {
            let user = &session.user;
            render(&Home {
                email: user.email.clone().unwrap_or_default(),
                display_name: user.display_name().to_string(),
                member_since: short_date(user.created_at.as_ref()),
            })
        }
        Ok(None) => render(&Landing),
        Err(e) => {
            error!("Auth error: {}", e);
            render(&Landing)
        }
    }
}
