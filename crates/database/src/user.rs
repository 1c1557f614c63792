//! User CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewUser, User};

/// Insert a new user and return it with its assigned id.
pub async fn create_user(pool: &SqlitePool, user: &NewUser) -> Result<User> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (chat_id, name, gender, age, height, weight, is_admin)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user.chat_id)
    .bind(&user.name)
    .bind(user.gender.as_str())
    .bind(user.age)
    .bind(user.height)
    .bind(user.weight)
    .bind(user.is_admin)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: user.chat_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(User {
        id,
        chat_id: user.chat_id,
        name: user.name.clone(),
        gender: user.gender.as_str().to_string(),
        age: user.age,
        height: user.height,
        weight: user.weight,
        is_admin: user.is_admin,
    })
}

/// Get a user by internal ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, chat_id, name, gender, age, height, weight, is_admin
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Get a user by conversation identifier. `None` when unregistered.
pub async fn get_user_by_chat_id(pool: &SqlitePool, chat_id: i64) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, chat_id, name, gender, age, height, weight, is_admin
        FROM users
        WHERE chat_id = ?
        "#,
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Update an existing user.
pub async fn update_user(pool: &SqlitePool, user: &User) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET chat_id = ?, name = ?, gender = ?, age = ?, height = ?, weight = ?, is_admin = ?
        WHERE id = ?
        "#,
    )
    .bind(user.chat_id)
    .bind(&user.name)
    .bind(&user.gender)
    .bind(user.age)
    .bind(user.height)
    .bind(user.weight)
    .bind(user.is_admin)
    .bind(user.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: user.id.to_string(),
        });
    }

    Ok(())
}

/// Delete a user by internal ID.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Count registered users (shown in the statistics screen).
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
