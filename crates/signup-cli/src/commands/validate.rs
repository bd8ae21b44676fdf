//! Offline validation command
//!
//! Runs the local field rules over the given values without touching the
//! network. Fields that are not given are validated as empty.

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use signup_core::validation::validate_all;
use signup_core::{Field, FieldError, FormValues, MajorList};
use tabled::Tabled;

use super::Context;
use crate::output::{print_output, print_success};

#[derive(Args, Default)]
pub struct ValidateArgs {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub password_again: Option<String>,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub student_id: Option<String>,
    #[arg(long)]
    pub major: Option<String>,
}

impl ValidateArgs {
    fn values(&self) -> FormValues {
        let pick = |v: &Option<String>| v.clone().unwrap_or_default();
        FormValues {
            username: pick(&self.username),
            password: pick(&self.password),
            password_again: pick(&self.password_again),
            first_name: pick(&self.first_name),
            last_name: pick(&self.last_name),
            student_id: pick(&self.student_id),
            major: pick(&self.major),
        }
    }
}

/// Validation row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ValidationRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Result")]
    pub result: String,
    #[tabled(skip)]
    #[serde(skip)]
    pub valid: bool,
}

pub async fn execute(ctx: &Context, args: ValidateArgs) -> Result<()> {
    let majors = ctx.config.majors()?;
    let rows = validation_rows(&args.values(), &majors);
    print_output(&rows, ctx.format)?;

    let invalid = rows.iter().filter(|r| !r.valid).count();
    if invalid > 0 {
        bail!("{} field(s) invalid", invalid);
    }
    print_success("All fields valid", ctx.quiet || ctx.format == crate::output::OutputFormat::Json);
    Ok(())
}

fn validation_rows(values: &FormValues, majors: &MajorList) -> Vec<ValidationRow> {
    let mut errors = validate_all(values);
    if !values.major.is_empty() && !majors.contains(&values.major) {
        errors.insert(Field::Major, FieldError::InvalidFormat("not in the major list"));
    }

    Field::ALL
        .into_iter()
        .map(|field| {
            let value = values.get(field);
            let error = errors.get(&field);
            ValidationRow {
                field: field.name().to_string(),
                value: mask(field, value),
                result: error.map_or_else(|| "ok".to_string(), |e| e.message().to_string()),
                valid: error.is_none(),
            }
        })
        .collect()
}

fn mask(field: Field, value: &str) -> String {
    if field.is_secret() && !value.is_empty() {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    }
}
