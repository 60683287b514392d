use crate::error::{GeoprospectError, Result};
use crate::formats::DEFAULT_MAX_IMPORT_BYTES;
use crate::spatial::{BoundaryLimits, ValidityMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the generative API key. Never read from files.
pub const API_KEY_ENV: &str = "GEOPROSPECT_API_KEY";

/// Thinking-token budget for deep-profile calls unless configured otherwise.
pub const DEFAULT_DEEP_THINKING_BUDGET: u32 = 32_768;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for GeoProspect
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub api_base_url: ConfigValue<String>,
    pub fast_model: ConfigValue<String>,
    pub default_model: ConfigValue<String>,
    pub deep_model: ConfigValue<String>,
    pub structured_model: ConfigValue<String>,
    pub deep_thinking_budget: ConfigValue<u32>,
    pub chart_points: ConfigValue<usize>,
    pub stage_delay_ms: ConfigValue<u64>,
    pub max_boundary_vertices: ConfigValue<usize>,
    pub boundary_validity: ConfigValue<ValidityMode>,
    pub max_import_bytes: ConfigValue<u64>,
    api_key: Option<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            api_base_url: ConfigValue::new(
                "https://generativelanguage.googleapis.com/v1beta".to_string(),
                ConfigSource::Default,
            ),
            fast_model: ConfigValue::new(
                "gemini-2.5-flash-lite".to_string(),
                ConfigSource::Default,
            ),
            default_model: ConfigValue::new("gemini-2.5-flash".to_string(), ConfigSource::Default),
            deep_model: ConfigValue::new("gemini-2.5-pro".to_string(), ConfigSource::Default),
            structured_model: ConfigValue::new(
                "gemini-2.5-flash".to_string(),
                ConfigSource::Default,
            ),
            deep_thinking_budget: ConfigValue::new(
                DEFAULT_DEEP_THINKING_BUDGET,
                ConfigSource::Default,
            ),
            chart_points: ConfigValue::new(20, ConfigSource::Default),
            stage_delay_ms: ConfigValue::new(800, ConfigSource::Default),
            max_boundary_vertices: ConfigValue::new(
                BoundaryLimits::default().max_vertices,
                ConfigSource::Default,
            ),
            boundary_validity: ConfigValue::new(ValidityMode::Lenient, ConfigSource::Default),
            max_import_bytes: ConfigValue::new(DEFAULT_MAX_IMPORT_BYTES, ConfigSource::Default),
            api_key: None,
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeoprospectError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeoprospectError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(url) = file_config.api_base_url {
            self.api_base_url.update(url, ConfigSource::File);
        }

        if let Some(models) = file_config.models {
            if let Some(m) = models.fast {
                self.fast_model.update(m, ConfigSource::File);
            }
            if let Some(m) = models.default {
                self.default_model.update(m, ConfigSource::File);
            }
            if let Some(m) = models.deep {
                self.deep_model.update(m, ConfigSource::File);
            }
            if let Some(m) = models.structured {
                self.structured_model.update(m, ConfigSource::File);
            }
        }

        if let Some(budget) = file_config.deep_thinking_budget {
            self.deep_thinking_budget.update(budget, ConfigSource::File);
        }

        if let Some(points) = file_config.chart_points {
            self.chart_points.update(validate_chart_points(points)?, ConfigSource::File);
        }

        if let Some(delay) = file_config.stage_delay_ms {
            self.stage_delay_ms.update(delay, ConfigSource::File);
        }

        if let Some(max) = file_config.max_boundary_vertices {
            self.max_boundary_vertices.update(max, ConfigSource::File);
        }

        if let Some(validity) = file_config.boundary_validity {
            self.boundary_validity.update(validity, ConfigSource::File);
        }

        if let Some(bytes) = file_config.max_import_bytes {
            self.max_import_bytes.update(bytes, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(url) = env::var("GEOPROSPECT_API_BASE_URL") {
            self.api_base_url.update(url, ConfigSource::Environment);
        }

        if let Ok(m) = env::var("GEOPROSPECT_FAST_MODEL") {
            self.fast_model.update(m, ConfigSource::Environment);
        }
        if let Ok(m) = env::var("GEOPROSPECT_DEFAULT_MODEL") {
            self.default_model.update(m, ConfigSource::Environment);
        }
        if let Ok(m) = env::var("GEOPROSPECT_DEEP_MODEL") {
            self.deep_model.update(m, ConfigSource::Environment);
        }
        if let Ok(m) = env::var("GEOPROSPECT_STRUCTURED_MODEL") {
            self.structured_model.update(m, ConfigSource::Environment);
        }

        if let Ok(budget_str) = env::var("GEOPROSPECT_DEEP_THINKING_BUDGET") {
            match budget_str.parse::<u32>() {
                Ok(budget) => self.deep_thinking_budget.update(budget, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPROSPECT_DEEP_THINKING_BUDGET value '{}': expected token count",
                    budget_str
                ),
            }
        }

        if let Ok(points_str) = env::var("GEOPROSPECT_CHART_POINTS") {
            match points_str.parse::<usize>().ok().filter(|p| validate_chart_points(*p).is_ok()) {
                Some(points) => self.chart_points.update(points, ConfigSource::Environment),
                None => tracing::warn!(
                    "Invalid GEOPROSPECT_CHART_POINTS value '{}': expected integer between 1 and 200",
                    points_str
                ),
            }
        }

        if let Ok(delay_str) = env::var("GEOPROSPECT_STAGE_DELAY_MS") {
            match delay_str.parse::<u64>() {
                Ok(delay) => self.stage_delay_ms.update(delay, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPROSPECT_STAGE_DELAY_MS value '{}': expected milliseconds",
                    delay_str
                ),
            }
        }

        if let Ok(max_str) = env::var("GEOPROSPECT_MAX_BOUNDARY_VERTICES") {
            match max_str.parse::<usize>() {
                Ok(max) => self.max_boundary_vertices.update(max, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPROSPECT_MAX_BOUNDARY_VERTICES value '{}': expected integer",
                    max_str
                ),
            }
        }

        if let Ok(validity_str) = env::var("GEOPROSPECT_BOUNDARY_VALIDITY") {
            match parse_validity_mode(&validity_str) {
                Ok(validity) => self.boundary_validity.update(validity, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPROSPECT_BOUNDARY_VALIDITY value '{}': expected strict or lenient",
                    validity_str
                ),
            }
        }

        if let Ok(bytes_str) = env::var("GEOPROSPECT_MAX_IMPORT_BYTES") {
            match bytes_str.parse::<u64>() {
                Ok(bytes) => self.max_import_bytes.update(bytes, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOPROSPECT_MAX_IMPORT_BYTES value '{}': expected integer",
                    bytes_str
                ),
            }
        }

        self.api_key = env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty());

        self
    }

    /// Update configuration from CLI arguments.
    ///
    /// Values are validated the same way as file values; nothing is applied
    /// when one is rejected.
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) -> Result<()> {
        let chart_points = overrides.chart_points.map(validate_chart_points).transpose()?;

        if let Some(url) = overrides.api_base_url {
            self.api_base_url.update(url, ConfigSource::Cli);
        }

        if let Some(points) = chart_points {
            self.chart_points.update(points, ConfigSource::Cli);
        }

        if let Some(delay) = overrides.stage_delay_ms {
            self.stage_delay_ms.update(delay, ConfigSource::Cli);
        }

        if let Some(validity) = overrides.boundary_validity {
            self.boundary_validity.update(validity, ConfigSource::Cli);
        }

        Ok(())
    }

    /// API key for the generative service
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| GeoprospectError::ConfigMissing {
            key: API_KEY_ENV.to_string(),
        })
    }

    /// Set the API key directly (tests and embedding applications)
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn boundary_limits(&self) -> BoundaryLimits {
        BoundaryLimits { max_vertices: self.max_boundary_vertices.value }
    }

    pub fn stage_delay(&self) -> Duration {
        Duration::from_millis(self.stage_delay_ms.value)
    }

    /// Get all configuration values as a map for inspection.
    ///
    /// The API key is reported only as set/unset.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "api_base_url".to_string(),
            (self.api_base_url.value.clone(), self.api_base_url.source),
        );
        map.insert("fast_model".to_string(), (self.fast_model.value.clone(), self.fast_model.source));
        map.insert(
            "default_model".to_string(),
            (self.default_model.value.clone(), self.default_model.source),
        );
        map.insert("deep_model".to_string(), (self.deep_model.value.clone(), self.deep_model.source));
        map.insert(
            "structured_model".to_string(),
            (self.structured_model.value.clone(), self.structured_model.source),
        );
        map.insert(
            "deep_thinking_budget".to_string(),
            (self.deep_thinking_budget.value.to_string(), self.deep_thinking_budget.source),
        );
        map.insert(
            "chart_points".to_string(),
            (self.chart_points.value.to_string(), self.chart_points.source),
        );
        map.insert(
            "stage_delay_ms".to_string(),
            (self.stage_delay_ms.value.to_string(), self.stage_delay_ms.source),
        );
        map.insert(
            "max_boundary_vertices".to_string(),
            (self.max_boundary_vertices.value.to_string(), self.max_boundary_vertices.source),
        );
        map.insert(
            "boundary_validity".to_string(),
            (format!("{:?}", self.boundary_validity.value), self.boundary_validity.source),
        );
        map.insert(
            "max_import_bytes".to_string(),
            (self.max_import_bytes.value.to_string(), self.max_import_bytes.source),
        );

        let (key_state, key_source) = match self.api_key {
            Some(_) => ("set", ConfigSource::Environment),
            None => ("unset", ConfigSource::Default),
        };
        map.insert("api_key".to_string(), (key_state.to_string(), key_source));

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    api_base_url: Option<String>,
    models: Option<ModelsSection>,
    deep_thinking_budget: Option<u32>,
    chart_points: Option<usize>,
    stage_delay_ms: Option<u64>,
    max_boundary_vertices: Option<usize>,
    boundary_validity: Option<ValidityMode>,
    max_import_bytes: Option<u64>,
}

/// `[models]` table of the config file
#[derive(Debug, Deserialize, Serialize)]
struct ModelsSection {
    fast: Option<String>,
    default: Option<String>,
    deep: Option<String>,
    structured: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub api_base_url: Option<String>,
    pub chart_points: Option<usize>,
    pub stage_delay_ms: Option<u64>,
    pub boundary_validity: Option<ValidityMode>,
}

/// Parse validity mode from string
pub fn parse_validity_mode(s: &str) -> Result<ValidityMode> {
    match s.to_lowercase().as_str() {
        "strict" => Ok(ValidityMode::Strict),
        "lenient" => Ok(ValidityMode::Lenient),
        _ => Err(GeoprospectError::ConfigInvalid {
            key: "boundary_validity".to_string(),
            reason: format!("Invalid validity mode: {}. Use strict or lenient", s),
        }),
    }
}

fn validate_chart_points(points: usize) -> Result<usize> {
    if (1..=200).contains(&points) {
        Ok(points)
    } else {
        Err(GeoprospectError::ConfigInvalid {
            key: "chart_points".to_string(),
            reason: format!("{} is outside 1..=200", points),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.chart_points.value, 20);
        assert_eq!(config.chart_points.source, ConfigSource::Default);
        assert_eq!(config.boundary_validity.value, ValidityMode::Lenient);
        assert_eq!(config.max_import_bytes.value, 5 * 1024 * 1024);
        assert!(config.api_key().is_err());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);

        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
chart_points = 30
stage_delay_ms = 0
boundary_validity = "Strict"

[models]
deep = "custom-deep-model"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.chart_points.value, 30);
        assert_eq!(config.chart_points.source, ConfigSource::File);
        assert_eq!(config.stage_delay(), Duration::ZERO);
        assert_eq!(config.boundary_validity.value, ValidityMode::Strict);
        assert_eq!(config.deep_model.value, "custom-deep-model");
        assert_eq!(config.fast_model.source, ConfigSource::Default);
    }

    #[test]
    fn test_file_rejects_bad_chart_points() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chart_points = 0").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, GeoprospectError::ConfigInvalid { ref key, .. } if key == "chart_points"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            chart_points: Some(12),
            boundary_validity: Some(ValidityMode::Strict),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.chart_points.value, 12);
        assert_eq!(config.chart_points.source, ConfigSource::Cli);
        assert_eq!(config.boundary_validity.value, ValidityMode::Strict);
        assert_eq!(config.api_base_url.source, ConfigSource::Default);
    }

    #[test]
    fn test_cli_rejects_bad_chart_points() {
        let mut config = LayeredConfig::with_defaults();

        let err = config
            .update_from_cli(CliConfigOverrides {
                chart_points: Some(0),
                stage_delay_ms: Some(5),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(err, GeoprospectError::ConfigInvalid { ref key, .. } if key == "chart_points"));
        assert_eq!(config.chart_points.value, 20);
        assert_eq!(config.chart_points.source, ConfigSource::Default);
        assert_eq!(config.stage_delay_ms.source, ConfigSource::Default);

        let err = config
            .update_from_cli(CliConfigOverrides { chart_points: Some(201), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, GeoprospectError::ConfigInvalid { ref key, .. } if key == "chart_points"));
    }

    #[test]
    fn test_deep_thinking_budget_from_file() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.deep_thinking_budget.value, DEFAULT_DEEP_THINKING_BUDGET);

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "deep_thinking_budget = 4096").unwrap();

        let config = config.load_from_file(file.path()).unwrap();
        assert_eq!(config.deep_thinking_budget.value, 4096);
        assert_eq!(config.deep_thinking_budget.source, ConfigSource::File);
    }

    #[test]
    fn test_parse_validity_mode() {
        assert_eq!(parse_validity_mode("strict").unwrap(), ValidityMode::Strict);
        assert_eq!(parse_validity_mode("LENIENT").unwrap(), ValidityMode::Lenient);
        assert!(parse_validity_mode("invalid").is_err());
    }

    #[test]
    fn test_inspection_map_hides_api_key() {
        let config = LayeredConfig::with_defaults().with_api_key("secret-key");
        let map = config.to_inspection_map();

        assert_eq!(map.len(), 12);
        let (key_value, _) = &map["api_key"];
        assert_eq!(key_value, "set");
        assert!(map.values().all(|(v, _)| !v.contains("secret-key")));

        let (points, source) = &map["chart_points"];
        assert_eq!(points, "20");
        assert_eq!(*source, ConfigSource::Default);
    }
}
