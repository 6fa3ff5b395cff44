//! One-time database bootstrap
//!
//! Creates the database named in a connection URL when it is missing, by
//! connecting to the `postgres` maintenance database on the same server.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

/// Database every Postgres server has, used to issue `CREATE DATABASE`.
const MAINTENANCE_DB: &str = "postgres";

/// Outcome of [`ensure_database`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    Created(String),
    AlreadyExists(String),
}

/// Create the target database if it does not exist yet.
///
/// # Errors
///
/// Fails if the URL does not name a database, or if the maintenance
/// connection or the `CREATE DATABASE` statement fails.
pub async fn ensure_database(database_url: &str) -> Result<Bootstrap, sqlx::Error> {
    let options = PgConnectOptions::from_str(database_url)?;
    let name = options
        .get_database()
        .map(str::to_owned)
        .ok_or_else(|| sqlx::Error::Configuration("database URL does not name a database".into()))?;

    let mut conn = PgConnection::connect_with(&options.clone().database(MAINTENANCE_DB)).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&name)
            .fetch_one(&mut conn)
            .await?;

    let outcome = if exists {
        Bootstrap::AlreadyExists(name)
    } else {
        // Identifiers cannot be bound as parameters
        let statement = format!("CREATE DATABASE {}", quote_ident(&name));
        sqlx::query(&statement).execute(&mut conn).await?;
        tracing::info!(database = %name, "database created");
        Bootstrap::Created(name)
    };

    conn.close().await?;
    Ok(outcome)
}

/// Quote a Postgres identifier, doubling embedded quotes.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("trainhub"), "\"trainhub\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[tokio::test]
    async fn rejects_invalid_url() {
        assert!(ensure_database("not a url").await.is_err());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn existing_database_is_left_alone() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let outcome = ensure_database(&url).await.expect("bootstrap failed");
        assert!(matches!(outcome, Bootstrap::AlreadyExists(_)));
    }
}
