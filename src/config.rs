//! Server configuration loaded from environment variables.

use std::env;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (default: 0.0.0.0)
    pub host: String,
    /// Bind port (default: 8080)
    pub port: u16,
    /// Public base URL used when building object-storage URLs
    /// (default: http://localhost:{port})
    pub public_base_url: String,
}

impl ServerConfig {
    /// Load the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `HOST` (optional, default: `0.0.0.0`): server bind host
    /// - `PORT` (optional, default: `8080`): server bind port
    /// - `PUBLIC_BASE_URL` (optional): external base URL for uploaded image
    ///   links; defaults to `http://localhost:{PORT}`
    ///
    /// # Errors
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| format!("PORT must be a valid port number, got '{}'", raw))?,
            Err(_) => 8080,
        };
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        Ok(Self {
            host,
            port,
            public_base_url,
        })
    }

    /// Socket address string for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}
