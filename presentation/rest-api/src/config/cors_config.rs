use poem::middleware::Cors;
use std::env;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Initialize CORS middleware for the admin and kanban frontends
///
/// Environment variables:
/// - CORS_ALLOWED_ORIGINS: Comma-separated list of allowed origins
///   (default: "http://localhost:3000")
pub fn init_cors() -> Cors {
    let raw = env::var("CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string());

    Cors::new()
        .allow_origins(parse_origins(&raw))
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec!["content-type", "authorization"])
        .allow_credentials(true)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
