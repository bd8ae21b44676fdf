//! Major list command

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use super::Context;
use crate::output::print_output;

#[derive(Args)]
pub struct MajorsArgs {
    /// Only show majors containing this text (case-insensitive)
    #[arg(long, short)]
    pub search: Option<String>,
}

/// Major row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct MajorRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Major")]
    pub name: String,
}

pub async fn execute(ctx: &Context, args: MajorsArgs) -> Result<()> {
    let list = ctx.config.majors()?;
    let rows = major_rows(&list.search(args.search.as_deref().unwrap_or("")));
    print_output(&rows, ctx.format)
}

fn major_rows(names: &[&str]) -> Vec<MajorRow> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| MajorRow {
            index: i + 1,
            name: name.to_string(),
        })
        .collect()
}
