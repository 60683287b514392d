use anyhow::Result;
use dialoguer::{Confirm, Input};

/// Answers collected before an interactive analysis run
#[derive(Debug, Clone)]
pub struct InteractiveAnalyzeResult {
    pub label: String,
    pub mineral: String,
    pub deep: bool,
}

/// Prompt for the run parameters, using the command-line values as defaults
pub fn interactive_analyze(label: &str, mineral: &str, deep: bool) -> Result<InteractiveAnalyzeResult> {
    println!("\n⛏  GeoProspect Analysis\n");

    let label: String = Input::new()
        .with_prompt("Location label (optional)")
        .default(label.to_string())
        .allow_empty(true)
        .interact_text()?;

    let mineral: String = Input::new()
        .with_prompt("Mineral focus (optional, e.g. gold, copper)")
        .default(mineral.to_string())
        .allow_empty(true)
        .interact_text()?;

    let deep = Confirm::new()
        .with_prompt("Run the deep-reasoning pass? (slower)")
        .default(deep)
        .interact()?;

    Ok(InteractiveAnalyzeResult { label, mineral, deep })
}
