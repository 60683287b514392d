use std::env;
use std::path::PathBuf;

use geoprospect_core::config::LayeredConfig;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Optional TOML file layered under the environment
    pub config_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 3001, cors_origin: "http://localhost:3000".to_string(), config_file: None }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("GEOPROSPECT_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let cors_origin = env::var("GEOPROSPECT_CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        let config_file = env::var("GEOPROSPECT_CONFIG").ok().map(PathBuf::from);

        Self { port, cors_origin, config_file }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Resolve the analysis configuration: defaults, optional file, then environment
    pub fn analysis_config(&self) -> geoprospect_core::Result<LayeredConfig> {
        let mut config = LayeredConfig::with_defaults();
        if let Some(path) = &self.config_file {
            config = config.load_from_file(path)?;
        }
        Ok(config.load_from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ApiConfig { port: 8080, ..Default::default() };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
