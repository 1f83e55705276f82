use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the Supabase project, e.g. https://abcd.supabase.co
    pub supabase_url: String,

    /// Public anon key sent as `apikey` on every backend request
    pub supabase_anon_key: String,

    pub host: String,
    pub port: u16,

    /// Maximum payload size for all requests (in bytes)
    /// Default: 1MB
    pub max_payload_size: usize,

    /// Per-request timeout for backend calls
    pub backend_timeout: Duration,

    /// Mark the session cookie `Secure`; enable behind HTTPS
    pub cookie_secure: bool,

    pub log_dir: String,
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Required environment variables:
    /// - SUPABASE_URL: project base URL
    /// - SUPABASE_ANON_KEY: project anon (public) key
    ///
    /// Optional environment variables:
    /// - HOST (default: 127.0.0.1), PORT (default: 8080)
    /// - MAX_PAYLOAD_SIZE: Maximum request payload size in bytes (default: 1048576)
    /// - BACKEND_TIMEOUT_SECS (default: 10)
    /// - COOKIE_SECURE (default: false)
    /// - LOG_DIR (default: logs)
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| "SUPABASE_URL must be set in .env file or environment".to_string())?;
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| "SUPABASE_ANON_KEY must be set in .env file or environment".to_string())?;
        if supabase_url.trim().is_empty() || supabase_anon_key.trim().is_empty() {
            return Err("SUPABASE_URL and SUPABASE_ANON_KEY must not be empty".to_string());
        }

        Ok(Config {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_anon_key,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            max_payload_size: parse_or("MAX_PAYLOAD_SIZE", 1024 * 1024),
            backend_timeout: Duration::from_secs(parse_or("BACKEND_TIMEOUT_SECS", 10)),
            cookie_secure: parse_or("COOKIE_SECURE", false),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        })
    }
}
