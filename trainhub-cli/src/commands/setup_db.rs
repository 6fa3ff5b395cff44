//! Database bootstrap command
//!
//! Creates the database if needed, then the schema. Safe to re-run.

use anyhow::{Context, Result};
use clap::Parser;

use trainhub_server::db::bootstrap::{ensure_database, Bootstrap};
use trainhub_server::db::{create_pool, migrations};

/// Arguments for the setup-db command
#[derive(Parser, Debug)]
pub struct SetupDbArgs {
    /// Database URL; the database it names is created if missing
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run_setup_db(args: SetupDbArgs) -> Result<()> {
    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

    match ensure_database(&database_url)
        .await
        .context("Failed to create database")?
    {
        Bootstrap::Created(name) => println!("Database '{}' created", name),
        Bootstrap::AlreadyExists(name) => println!("Database '{}' already exists", name),
    }

    let pool = create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;

    migrations::run(&pool)
        .await
        .context("Failed to create tables")?;

    pool.close().await;
    println!("Tables created successfully");
    Ok(())
}
