use console::style;
use serde::Serialize;
use std::fmt::Display;
use tabled::{settings::Style, Table, Tabled};

/// Output format mode
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self { format: if json { OutputFormat::Json } else { OutputFormat::Human } }
    }

    pub fn success(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => println!("{} {}", style("✓").green().bold(), message),
            OutputFormat::Json => print_status("success", message),
        }
    }

    pub fn info(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => println!("{} {}", style("ℹ").blue().bold(), message),
            OutputFormat::Json => print_status("info", message),
        }
    }

    pub fn warning(&self, message: impl Display) {
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", style("⚠").yellow().bold(), message),
            OutputFormat::Json => eprint_status("warning", message),
        }
    }

    pub fn table<T: Tabled + Serialize>(&self, data: Vec<T>) {
        match self.format {
            OutputFormat::Human => {
                if data.is_empty() {
                    println!("{}", style("(no data)").dim());
                } else {
                    let mut table = Table::new(data);
                    table.with(Style::rounded());
                    println!("{}", table);
                }
            }
            OutputFormat::Json => print_json(&serde_json::json!({ "data": data })),
        }
    }

    /// Print free text as-is (human mode only)
    pub fn text(&self, text: impl Display) {
        if let OutputFormat::Human = self.format {
            println!("{}", text);
        }
    }

    pub fn result<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let json = match self.format {
            OutputFormat::Human => serde_json::to_string_pretty(&data)?,
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "status": "success",
                "data": data,
            }))?,
        };
        println!("{}", json);
        Ok(())
    }

    pub fn kv(&self, key: impl Display, value: impl Display) {
        match self.format {
            OutputFormat::Human => println!("{}: {}", style(key).bold(), value),
            OutputFormat::Json => print_json(&serde_json::json!({ key.to_string(): value.to_string() })),
        }
    }

    pub fn section(&self, title: impl Display) {
        match self.format {
            OutputFormat::Human => println!("\n{}", style(title).bold().underlined()),
            OutputFormat::Json => {}
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

fn status_json(status: &str, message: impl Display) -> serde_json::Value {
    serde_json::json!({
        "status": status,
        "message": message.to_string(),
    })
}

fn print_status(status: &str, message: impl Display) {
    print_json(&status_json(status, message));
}

fn eprint_status(status: &str, message: impl Display) {
    match serde_json::to_string_pretty(&status_json(status, message)) {
        Ok(json) => eprintln!("{}", json),
        Err(e) => tracing::error!(error = %e, "Failed to serialize output"),
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!(error = %e, "Failed to serialize output"),
    }
}
