// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;
#[cfg(test)]
pub use types::{HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StoreConfig};

/// Environment variable that overrides `server.port`
const PORT_ENV: &str = "PORT";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        Self::builder(config_path, std::env::var(PORT_ENV).ok())?
            .build()?
            .try_deserialize()
    }

    fn builder(
        config_path: &str,
        port: Option<String>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("TOKO").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "toko-api/0.1")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .set_default("http.strict_methods", true)?
            .set_default("store.seed", true)?
            .set_override_option("server.port", port.filter(|p| !p.is_empty()))
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
