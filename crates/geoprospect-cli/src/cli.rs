use clap::{Parser, Subcommand};
use geoprospect_core::config::CliConfigOverrides;
use geoprospect_core::spatial::ValidityMode;
use std::path::PathBuf;

/// GeoProspect - Exploration report synthesis for geospatial targets
#[derive(Parser, Debug)]
#[command(name = "geoprospect")]
#[command(about = "Exploration report synthesis for geospatial targets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Show planned model calls without executing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Configuration file (defaults to ./geoprospect.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the model service base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Override the number of chart samples requested
    #[arg(long, global = true, value_name = "N")]
    pub chart_points: Option<usize>,

    /// Override the pause between status stages
    #[arg(long, global = true, value_name = "MS")]
    pub stage_delay_ms: Option<u64>,

    /// Boundary validity mode
    #[arg(long, global = true)]
    pub validity: Option<ValidityArg>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration overrides given on the command line
    pub fn overrides(&self) -> CliConfigOverrides {
        CliConfigOverrides {
            api_base_url: self.api_base_url.clone(),
            chart_points: self.chart_points,
            stage_delay_ms: self.stage_delay_ms,
            boundary_validity: self.validity.map(ValidityMode::from),
        }
    }
}

/// Boundary validity selection
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ValidityArg {
    /// Reject self-intersecting or zero-area boundaries
    Strict,
    /// Keep them and log a warning
    Lenient,
}

impl From<ValidityArg> for ValidityMode {
    fn from(arg: ValidityArg) -> Self {
        match arg {
            ValidityArg::Strict => ValidityMode::Strict,
            ValidityArg::Lenient => ValidityMode::Lenient,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a boundary from a CSV file
    Import(ImportArgs),

    /// Run an exploration analysis for a point or boundary
    Analyze(AnalyzeArgs),

    /// Show the resolved configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// CSV file with latitude/longitude columns
    pub path: PathBuf,

    /// Print the boundary as a GeoJSON feature
    #[arg(long)]
    pub geojson: bool,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Latitude of the selected point
    #[arg(long, allow_hyphen_values = true, requires = "lng")]
    pub lat: Option<f64>,

    /// Longitude of the selected point
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<f64>,

    /// CSV boundary; takes precedence over the point when it has 3+ vertices
    #[arg(long, value_name = "FILE")]
    pub boundary: Option<PathBuf>,

    /// Place name shown alongside the coordinates
    #[arg(long, default_value = "")]
    pub label: String,

    /// Commodity to focus on (e.g., gold, copper)
    #[arg(long, default_value = "")]
    pub mineral: String,

    /// Also run the deep-reasoning pass
    #[arg(long)]
    pub deep: bool,

    /// Write chart data as CSV to this path
    #[arg(long, value_name = "PATH")]
    pub chart_csv: Option<PathBuf>,

    /// Write the report markdown to this path
    #[arg(long, value_name = "PATH")]
    pub report_md: Option<PathBuf>,

    /// Map snapshot reference attached to the report
    #[arg(long, value_name = "REF")]
    pub snapshot: Option<String>,

    /// Interactive mode - prompt for label, focus and deep pass
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_point() {
        let cli = Cli::try_parse_from([
            "geoprospect", "analyze", "--lat", "-8.5", "--lng", "116.2", "--mineral", "gold", "--deep",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.lat, Some(-8.5));
                assert_eq!(args.lng, Some(116.2));
                assert_eq!(args.mineral, "gold");
                assert!(args.deep);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_lat_requires_lng() {
        assert!(Cli::try_parse_from(["geoprospect", "analyze", "--lat", "1.0"]).is_err());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from([
            "geoprospect", "config", "--chart-points", "12", "--validity", "strict",
        ])
        .unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.chart_points, Some(12));
        assert_eq!(overrides.boundary_validity, Some(ValidityMode::Strict));
        assert!(overrides.api_base_url.is_none());
    }
}
