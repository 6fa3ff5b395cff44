//! HTTP server command for the exercise API

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use trainhub_server::db::{create_pool_with_options, migrations, pool::DEFAULT_MAX_CONNECTIONS};
use trainhub_server::http::{run_server, ServerConfig};
use trainhub_server::{ExerciseStore, MemoryExerciseStore, PgExerciseStore};

/// Storage backend for the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// PostgreSQL at --database-url
    Postgres,
    /// Process memory; everything is lost on exit
    Memory,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "TRAINHUB_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (postgres store only)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "TRAINHUB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Storage backend
    #[arg(long, value_enum, default_value_t = StoreKind::Postgres)]
    pub store: StoreKind,
}

async fn open_store(args: &ServeArgs) -> Result<Arc<dyn ExerciseStore>> {
    match args.store {
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store - data is lost on shutdown");
            Ok(Arc::new(MemoryExerciseStore::new()))
        }
        StoreKind::Postgres => {
            let database_url = args
                .database_url
                .as_deref()
                .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

            let pool = create_pool_with_options(database_url, args.max_connections)
                .await
                .context("Failed to create database pool")?;

            migrations::run(&pool)
                .await
                .context("Failed to run migrations")?;

            Ok(Arc::new(PgExerciseStore::new(pool)))
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting trainhub server on {}", args.bind);

    let store = open_store(&args).await?;

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        request_timeout: Duration::from_secs(args.timeout),
    };

    // Blocks until shutdown
    run_server(store, config).await.context("Server error")?;

    Ok(())
}
