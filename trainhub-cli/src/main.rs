//! trainhub CLI - exercise library server
//!
//! - `serve`: run the HTTP API (PostgreSQL or in-memory store)
//! - `setup-db`: create the database and its tables

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "trainhub",
    author,
    version,
    about = "Exercise library API with free-form tags",
    long_about = "Serve exercises (name, instructions, enrichment, video link) and their \
                  shared tags over HTTP, backed by PostgreSQL."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the database (if missing) and its tables
    SetupDb(commands::setup_db::SetupDbArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }) {
        eprintln!("warning: logging disabled: {e}");
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::SetupDb(args) => commands::run_setup_db(args).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["trainhub", "serve", "--store", "memory"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.store, commands::serve::StoreKind::Memory);
                assert_eq!(args.timeout, 30);
                assert!(!args.cors_permissive);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_store() {
        assert!(Cli::try_parse_from(["trainhub", "serve", "--store", "sqlite"]).is_err());
    }
}
