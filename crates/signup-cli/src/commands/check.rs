//! Username availability command

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;
use signup_core::display::USERNAME_RULES;
use signup_core::validation::validate_username;
use signup_core::{Availability, HttpUserDirectory, UserDirectory};
use tabled::Tabled;

use super::Context;
use crate::output::{print_error, print_single};

#[derive(Args)]
pub struct CheckArgs {
    /// Username to look up
    pub username: String,
}

/// Check result for table display
#[derive(Debug, Serialize, Tabled)]
pub struct CheckRow {
    #[tabled(rename = "Username")]
    pub username: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

pub async fn execute(ctx: &Context, args: CheckArgs) -> Result<()> {
    if let Some(err) = validate_username(&args.username) {
        print_error(&format!("{}: {}", args.username, err));
        for rule in USERNAME_RULES {
            print_error(&format!("  • {}", rule));
        }
        bail!("Username {:?} is not a valid user ID", args.username);
    }

    let directory = HttpUserDirectory::new(&ctx.config)?;
    let row = check_row(&directory, &args.username).await?;
    print_single(&row, ctx.format)?;

    if row.status != "available" {
        bail!("Username {:?} is already in use", args.username);
    }
    Ok(())
}

async fn check_row<D: UserDirectory + ?Sized>(directory: &D, username: &str) -> Result<CheckRow> {
    let availability = match directory.check_username(username).await {
        Ok(availability) => availability,
        Err(e) if e.is_client_error() => Availability::Taken,
        Err(e) => return Err(e.into()),
    };
    let status = match availability {
        Availability::Available => "available",
        Availability::Taken => "in use",
    };
    Ok(CheckRow {
        username: username.to_string(),
        status: status.to_string(),
    })
}
