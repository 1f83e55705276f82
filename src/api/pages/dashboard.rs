use actix_web::{get, web::Data, HttpResponse};

use super::short_date;
use crate::api::session::AuthenticatedUser;
use crate::api::state::AppState;
use crate::backend::profiles::ProfileRepository;
use crate::templates::{render, Dashboard};

#[get("")]
async fn overview(user: AuthenticatedUser, state: Data<AppState>) -> HttpResponse {
    let profile = ProfileRepository::get(state.backend(), &user.access_token, &user.user.id).await;

    render(&Dashboard {
        email: user.user.email.clone().unwrap_or_default(),
        user_id: user.user.id.clone(),
        created: short_date(user.user.created_at.as_ref()),
        full_name: profile.map(|p| {
            p.full_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Not set".to_string())
        }),
    })
}
