//! arenad_init - One-time database initialization tool
//!
//! Creates a fresh arenad database with an admin account.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arenad database initialization tool
#[derive(Parser, Debug)]
#[command(
    name = "arenad_init",
    version,
    about = "Initialize a new arenad database"
)]
struct Args {
    /// Path to SQLite database file to create (must not exist)
    #[arg(short, long)]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arenad=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Credentials come from the environment so they stay out of shell history
    let admin_username = std::env::var("ARENAD_ADMIN_USERNAME")
        .map_err(|_| anyhow!("ARENAD_ADMIN_USERNAME environment variable is required"))?;

    let admin_password = std::env::var("ARENAD_ADMIN_PASSWORD")
        .map_err(|_| anyhow!("ARENAD_ADMIN_PASSWORD environment variable is required"))?;

    arenad::init::init_database(&args.database, &admin_username, &admin_password).await?;

    Ok(())
}
