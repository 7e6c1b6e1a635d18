//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::client::PredictionReport;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the probability breakdown table
#[derive(Tabled)]
struct ProbabilityRow {
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Probability")]
    probability: String,
}

/// Print a prediction report
pub fn print_report(report: &PredictionReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(report) {
                println!("{}", json);
            }
        }
        OutputFormat::Table => {
            if report.label == "has_account" {
                print_success(&format!("This individual likely {}", report.label_text));
            } else {
                print_warning(&format!("This individual likely {}", report.label_text));
            }

            let rows = vec![
                ProbabilityRow {
                    outcome: "No bank account".to_string(),
                    probability: report.percent_no_account.clone(),
                },
                ProbabilityRow {
                    outcome: "Has bank account".to_string(),
                    probability: report.percent_has_account.clone(),
                },
            ];
            let table = Table::new(rows).with(Style::rounded()).to_string();
            println!("{}", table);

            if let Some(generated) = chrono::DateTime::from_timestamp(report.generated_at, 0) {
                println!("Generated at {}", generated.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Color status based on value
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "healthy" => status.green().to_string(),
        "degraded" => status.yellow().to_string(),
        "unhealthy" => status.red().to_string(),
        _ => status.to_string(),
    }
}
