//! Output formatting module
//!
//! Provides table and JSON output formatting for CLI commands, plus the
//! terminal rendering of field hints.

use colored::Colorize;
use serde::Serialize;
use signup_core::display::{FieldHint, Tone};
use std::fmt::Display;
use tabled::{Table, Tabled};

/// Output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {}. Use 'table' or 'json'", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Print data in the specified format
pub fn print_output<T>(data: &[T], format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
{
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("No items found.");
            } else {
                let table = Table::new(data).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Print a single item in the specified format
pub fn print_single<T>(data: &T, format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
{
    match format {
        OutputFormat::Table => {
            let table = Table::new([data]).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// Print a success message (respects quiet mode)
pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message.green());
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

fn paint(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Neutral => text.dimmed().to_string(),
        Tone::Success => text.blue().to_string(),
        Tone::Error => text.red().to_string(),
    }
}

/// Terminal rendering of a field hint; `None` when nothing is shown
pub fn format_hint(hint: &FieldHint) -> Option<String> {
    match hint {
        FieldHint::Hidden => None,
        FieldHint::RequiredWarning => Some(format!("  {}", "⚠ Required".red())),
        FieldHint::Message { text, tone } => Some(format!("  {}", paint(text, *tone))),
        FieldHint::Rules { rules, tone } => Some(
            rules
                .iter()
                .map(|rule| format!("  • {}", paint(rule, *tone)))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
    }
}
