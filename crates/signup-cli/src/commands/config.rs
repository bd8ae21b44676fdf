//! Config command
//!
//! Shows the effective configuration and where each value came from.

use anyhow::Result;
use serde::Serialize;
use signup_core::config::{ENV_API_URL, ENV_MAJORS_FILE, ENV_TIMEOUT_SECS};
use tabled::Tabled;

use super::Context;
use crate::output::print_output;

/// Config row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

pub async fn execute(ctx: &Context) -> Result<()> {
    let rows = config_rows(&ctx.config);
    print_output(&rows, ctx.format)
}

fn config_rows(config: &signup_core::Config) -> Vec<ConfigRow> {
    let majors_value = match &config.majors_file {
        Some(path) => path.display().to_string(),
        None => "(built-in)".to_string(),
    };

    vec![
        ConfigRow {
            key: ENV_API_URL.to_string(),
            value: config.api_url.clone(),
            source: config.sources.api_url.to_string(),
        },
        ConfigRow {
            key: ENV_TIMEOUT_SECS.to_string(),
            value: config.timeout_secs.to_string(),
            source: config.sources.timeout_secs.to_string(),
        },
        ConfigRow {
            key: ENV_MAJORS_FILE.to_string(),
            value: majors_value,
            source: config.sources.majors_file.to_string(),
        },
    ]
}
