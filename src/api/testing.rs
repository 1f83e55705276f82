//! Shared fixtures for the handler tests

use std::sync::Arc;

use actix_web::{cookie::Cookie, web};
use chrono::{TimeZone, Utc};

use crate::api::job_post::JobPostService;
use crate::api::session::ACCESS_COOKIE;
use crate::api::state::AppState;
use crate::api::{configure, validation};
use crate::backend::memory::MemoryBackend;
use crate::backend::models::AuthUser;

pub const TOKEN: &str = "token-user-1";
pub const BEARER: (&str, &str) = ("Authorization", "Bearer token-user-1");

pub fn user() -> AuthUser {
    AuthUser {
        id: "user-1".into(),
        email: Some("ada@example.com".into()),
        created_at: Some(Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()),
    }
}

/// Backend where `TOKEN` is a live session for `user()`
pub fn signed_in_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    backend.add_session(TOKEN, user());
    backend
}

pub fn session_cookie() -> Cookie<'static> {
    Cookie::new(ACCESS_COOKIE, TOKEN)
}

/// Register app data and every route, the same way `main` does
pub fn install(cfg: &mut web::ServiceConfig, backend: Arc<MemoryBackend>) {
    cfg.app_data(web::Data::new(AppState::new(backend.clone(), false)))
        .app_data(web::Data::new(JobPostService::new(backend)))
        .app_data(validation::json_config());
    configure(cfg);
}
