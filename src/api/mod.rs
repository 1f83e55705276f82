use actix_web::web::ServiceConfig;

pub mod health;
pub mod job_post;
pub mod pages;
pub mod session;
pub mod state;
pub mod validation;

#[cfg(test)]
mod testing;

/// Every route the application serves
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.configure(health::health_config)
        .configure(job_post::handlers::job_post_config)
        .configure(pages::pages_config);
}
