//! Server-rendered HTML pages

use actix_web::web::{self, ServiceConfig};

pub mod auth;
pub mod board;
pub mod dashboard;
pub mod home;
pub mod job_posts;

/// `Mar 5, 2024` style date used across account pages
pub(crate) fn short_date(date: Option<&chrono::DateTime<chrono::Utc>>) -> Option<String> {
    date.map(crate::api::job_post::card::format_date)
}

pub fn pages_config(config: &mut ServiceConfig) {
    config
        .service(home::home)
        .service(board::job_board)
        .service(
            web::scope("/dashboard")
                .service(dashboard::overview)
                .service(job_posts::list)
                .service(job_posts::new_form)
                .service(job_posts::create)
                .service(job_posts::edit_form)
                .service(job_posts::update)
                .service(job_posts::delete),
        )
        .configure(auth::auth_config);
}
