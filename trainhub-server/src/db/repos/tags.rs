//! Tag rows and the exercise/tag association
//!
//! All writes run on the caller's transaction. Tag creation is a single
//! insert-or-skip statement, never a check-then-insert.

use sqlx::{PgConnection, PgPool};

use crate::db::DbError;
use crate::models::TagSet;

/// Make sure a row exists for every tag in the set.
///
/// A concurrent transaction inserting the same name makes this statement
/// wait on the unique index and then skip the row. Rows go in sorted by
/// name so two writers always take those index locks in the same order.
pub(crate) async fn ensure_exist(conn: &mut PgConnection, tags: &TagSet) -> Result<(), DbError> {
    if tags.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO tags (name)
        SELECT n FROM UNNEST($1::text[]) AS n
        ORDER BY n
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(tags.to_names())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Link an exercise to every tag in the set.
pub(crate) async fn attach(
    conn: &mut PgConnection,
    exercise_id: &str,
    tags: &TagSet,
) -> Result<(), DbError> {
    if tags.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO exercise_tags (exercise_id, tag_name)
        SELECT $1, UNNEST($2::text[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(exercise_id)
    .bind(tags.to_names())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Drop every association row of an exercise. Tag rows are untouched.
pub(crate) async fn detach_all(conn: &mut PgConnection, exercise_id: &str) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM exercise_tags WHERE exercise_id = $1")
        .bind(exercise_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

/// All tag names.
pub(crate) async fn list_names(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let names: Vec<String> = sqlx::query_scalar("SELECT name FROM tags")
        .fetch_all(pool)
        .await?;
    Ok(names)
}
