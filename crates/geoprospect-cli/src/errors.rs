use console::style;
use geoprospect_analysis::AnalysisError;
use geoprospect_core::{GeoprospectError, ImportError};
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), context: None, suggestions: Vec::new(), help_command: None }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for a missing API key
pub fn missing_api_key() -> CliError {
    CliError::new("Model service API key not set")
        .with_context("Analysis runs call the generative model service, which needs an API key.")
        .with_suggestion("Set the key: export GEOPROSPECT_API_KEY=\"...\"")
        .with_suggestion("Or preview the prompts without calling the service: --dry-run")
        .with_help("Run: geoprospect config")
}

/// Create error for an analysis without a point or boundary
pub fn no_target() -> CliError {
    CliError::new("No analysis target")
        .with_context("Select a point or supply a boundary with at least 3 vertices.")
        .with_suggestion("Analyze a point: geoprospect analyze --lat -8.5 --lng 116.2")
        .with_suggestion("Analyze an area: geoprospect analyze --boundary area.csv")
        .with_help("Run: geoprospect analyze --help")
}

/// Create error for a missing boundary file
pub fn boundary_file_not_found(path: &Path) -> CliError {
    CliError::new("Boundary file not found")
        .with_context(format!("The specified boundary file does not exist.\n\nPath: {}", path.display()))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Use absolute path or path relative to current directory")
        .with_help("Run: geoprospect import --help")
}

/// Create error for a failed boundary import
pub fn import_failed(path: &Path, error: &ImportError) -> CliError {
    let base = CliError::new("Boundary import failed")
        .with_context(format!("File: {}\n\nError: {}", path.display(), error));

    let err = match error {
        ImportError::WrongExtension { .. } => base.with_suggestion("Save the boundary as a .csv file"),
        ImportError::TooLarge { limit, .. } => base
            .with_suggestion(format!("Reduce the file below {} bytes", limit))
            .with_suggestion("Or raise GEOPROSPECT_MAX_IMPORT_BYTES"),
        ImportError::EmptyInput => base.with_suggestion("Check that the file is not empty"),
        ImportError::NoValidRows => base
            .with_suggestion("Use a header such as `lat,lng` or `latitude;longitude`")
            .with_suggestion("Check that latitudes are within -90..90 and longitudes within -180..180"),
    };
    err.with_help("Run: geoprospect import --help")
}

/// Create error for a boundary rejected by validation
pub fn invalid_boundary(error: &GeoprospectError) -> CliError {
    CliError::new("Boundary rejected")
        .with_context(format!("Error: {}", error))
        .with_suggestion("Check the vertex order so edges do not cross")
        .with_suggestion("Or keep the boundary with a warning: --validity lenient")
        .with_help("Run: geoprospect import --help")
}

/// Create error for a run that ended in ERROR
pub fn analysis_failed(notice: &str) -> CliError {
    CliError::new("Analysis failed")
        .with_context(notice.to_string())
        .with_suggestion("Check network access to the model service")
        .with_suggestion("Re-run the analysis; nothing is retried automatically")
        .with_help("Run: geoprospect config")
}

/// Convert an analysis error to a CliError with context
pub fn from_analysis(error: AnalysisError) -> CliError {
    match error {
        AnalysisError::NoTarget => no_target(),
        AnalysisError::Boundary(GeoprospectError::Import(e)) => {
            import_failed(Path::new("(upload)"), &e)
        }
        AnalysisError::Boundary(e) => invalid_boundary(&e),
        other => CliError::new(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_suggestions() {
        let err = import_failed(Path::new("area.txt"), &ImportError::WrongExtension {
            file_name: "area.txt".to_string(),
        });
        assert_eq!(err.message, "Boundary import failed");
        assert!(err.suggestions[0].contains(".csv"));
    }

    #[test]
    fn test_from_analysis_no_target() {
        let err = from_analysis(AnalysisError::NoTarget);
        assert_eq!(err.to_string(), "No analysis target");
        assert!(err.help_command.is_some());
    }
}
