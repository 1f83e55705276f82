use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

mod api;
mod backend;
mod config;
mod shutdown;
mod templates;

use crate::api::{job_post::JobPostService, state::AppState, validation};
use crate::backend::{Backend, SupabaseClient};
use crate::shutdown::ShutdownCoordinator;

/// Job board web application backed by Supabase
#[derive(Parser, Debug)]
#[command(name = "jobby")]
#[command(version)]
struct Args {
    /// Address to bind, overrides HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides PORT
    #[arg(long)]
    port: Option<u16>,
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::other(message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let config::Config {
        supabase_url,
        supabase_anon_key,
        host,
        port,
        max_payload_size,
        backend_timeout,
        cookie_secure,
        log_dir,
    } = config::Config::from_env().map_err(io_error)?;
    let host = args.host.unwrap_or(host);
    let port = args.port.unwrap_or(port);

    std::fs::create_dir_all(&log_dir)?;

    // Daily rotating files per level, e.g. logs/info.log.2024-12-22, plus console output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(&log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(&log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(&log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(&log_dir, "debug.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    info!("Starting jobby");
    info!("Configuration loaded successfully:");
    info!("  - Backend: {}", supabase_url);
    info!("  - Backend timeout: {:?}", backend_timeout);
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Secure cookies: {}", cookie_secure);

    let backend: Arc<dyn Backend> = Arc::new(
        SupabaseClient::new(&supabase_url, &supabase_anon_key, backend_timeout)
            .map_err(|e| io_error(format!("Failed to build backend client: {e}")))?,
    );

    let server = HttpServer::new(move || {
        let state = web::Data::new(AppState::new(backend.clone(), cookie_secure));
        let job_post_service = web::Data::new(JobPostService::new(backend.clone()));

        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);
        let form_config = web::FormConfig::default().limit(max_payload_size);
        let json_config = web::JsonConfig::default().limit(max_payload_size);

        App::new()
            .wrap(Logger::default())
            .app_data(state)
            .app_data(job_post_service)
            .app_data(payload_config)
            .app_data(form_config)
            .app_data(json_config)
            .app_data(validation::json_config().limit(max_payload_size))
            .configure(api::configure)
    });

    info!("Server starting on http://{}:{}", host, port);

    let server = server.bind((host.as_str(), port))?.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task)
        .wait_for_shutdown()
        .await
}
