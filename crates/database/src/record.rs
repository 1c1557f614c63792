//! Record CRUD operations.

use bot_core::RecordKind;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewRecord, Record};

/// Default page size for history queries.
pub const DEFAULT_HISTORY_LIMIT: i64 = 3;

/// Insert a new record and return it with its assigned id and timestamp.
pub async fn insert_record(pool: &SqlitePool, record: &NewRecord) -> Result<Record> {
    let inserted = sqlx::query_as::<_, Record>(
        r#"
        INSERT INTO records (user_id, kind, recommendations, indicators, info)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, kind, recommendations, indicators, info, created_at
        "#,
    )
    .bind(record.user_id)
    .bind(record.kind.as_str())
    .bind(&record.recommendations)
    .bind(&record.indicators)
    .bind(&record.info)
    .fetch_one(pool)
    .await?;

    Ok(inserted)
}

/// Get a record by ID.
pub async fn get_record(pool: &SqlitePool, id: i64) -> Result<Record> {
    sqlx::query_as::<_, Record>(
        r#"
        SELECT id, user_id, kind, recommendations, indicators, info, created_at
        FROM records
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Record",
        id: id.to_string(),
    })
}

/// List the newest records of one kind for a user, newest first.
pub async fn list_records(
    pool: &SqlitePool,
    user_id: i64,
    kind: RecordKind,
    limit: i64,
) -> Result<Vec<Record>> {
    let records = sqlx::query_as::<_, Record>(
        r#"
        SELECT id, user_id, kind, recommendations, indicators, info, created_at
        FROM records
        WHERE user_id = ? AND kind = ?
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Delete all records belonging to a user. Returns the number removed.
pub async fn delete_records_for_user(pool: &SqlitePool, user_id: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM records
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Count all stored records (shown in the statistics screen).
pub async fn count_records(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM records
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
