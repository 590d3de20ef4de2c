use std::env;

const DEFAULT_IP: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8001";

/// Server configuration for HTTP listener
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub ip: String,
    pub port: String,
}

impl ServerConfig {
    /// Load server configuration from environment variables
    ///
    /// Environment variables:
    /// - SERVICE_IP: IP address to bind (default: "0.0.0.0")
    /// - SERVICE_PORT: Port to bind (default: "8001")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let ip = lookup("SERVICE_IP").unwrap_or_else(|| DEFAULT_IP.to_string());
        let port = lookup("SERVICE_PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());

        Self { ip, port }
    }

    /// Get the bind address as "ip:port"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}
