//! Schema migrations for exercise tables
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so this runs on each
//! server start as well as from `trainhub setup-db`.

use sqlx::PgPool;

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running exercise migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exercises (
            id VARCHAR(36) PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            instructions VARCHAR(2000),
            enrichment VARCHAR(1000),
            video_url VARCHAR(255)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            name VARCHAR(50) PRIMARY KEY
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Composite key keeps each (exercise, tag) pair unique
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exercise_tags (
            exercise_id VARCHAR(36) NOT NULL REFERENCES exercises(id) ON DELETE CASCADE,
            tag_name VARCHAR(50) NOT NULL REFERENCES tags(name),
            PRIMARY KEY (exercise_id, tag_name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_exercise_tags_tag ON exercise_tags(tag_name)")
        .execute(pool)
        .await?;

    tracing::info!("Exercise migrations complete");
    Ok(())
}
