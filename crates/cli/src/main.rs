//! Jiraibrary CLI - Database migrations, seeding and browse queries.
//!
//! # Usage
//!
//! ```bash
//! # Run catalog database migrations
//! jb-cli migrate
//!
//! # Import a catalog snapshot
//! jb-cli seed fixtures/catalog.yaml
//!
//! # Run a browse query and print the response
//! jb-cli browse --query "brand=angelic-pretty&limit=5"
//! jb-cli browse --fixture fixtures/catalog.yaml --query "q=garden"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "jb-cli")]
#[command(author, version, about = "Jiraibrary CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run catalog database migrations
    Migrate,
    /// Import a YAML or JSON catalog snapshot into the database
    Seed {
        /// Path to the snapshot file
        file: PathBuf,
    },
    /// Run a browse query and print the JSON response
    Browse {
        /// Raw query string, e.g. `brand=baby&limit=5`
        #[arg(short, long, default_value = "")]
        query: String,

        /// Browse an in-memory snapshot instead of the database
        #[arg(short, long)]
        fixture: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::catalog().await?,
        Commands::Seed { file } => commands::seed::snapshot(&file).await?,
        Commands::Browse { query, fixture } => {
            commands::browse::run(&query, fixture.as_deref()).await?;
        }
    }
    Ok(())
}
