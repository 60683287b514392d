//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use geoprospect_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "geoprospect.toml";

/// Resolve which configuration file to read, if any.
///
/// An explicit path must exist; the default file is optional.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

/// Load layered configuration: defaults, file, environment, then CLI overrides
pub fn load_config(explicit: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path(explicit) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides).context("Invalid command-line configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoprospect_core::config::ConfigSource;
    use std::io::Write;

    #[test]
    fn test_explicit_file_and_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chart_points = 30\nstage_delay_ms = 10").unwrap();

        let overrides = CliConfigOverrides { stage_delay_ms: Some(0), ..Default::default() };
        let config = load_config(Some(file.path()), overrides).unwrap();

        assert_eq!(config.stage_delay_ms.value, 0);
        assert_eq!(config.stage_delay_ms.source, ConfigSource::Cli);
        assert_eq!(config.chart_points.value, 30);
        assert_eq!(config.chart_points.source, ConfigSource::File);
    }

    #[test]
    fn test_out_of_range_chart_points_flag_is_error() {
        let overrides = CliConfigOverrides { chart_points: Some(0), ..Default::default() };
        let err = load_config(None, overrides).unwrap_err();

        assert!(err.to_string().contains("Invalid command-line configuration"));
        assert!(format!("{:#}", err).contains("chart_points"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load_config(Some(Path::new("/nonexistent/geoprospect.toml")), Default::default());
        assert!(result.is_err());
    }
}
