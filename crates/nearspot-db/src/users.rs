//! CRUD for the `users` table.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

/// A full row from the `users` table, including the password hash.
///
/// Only the auth paths should see this; API-facing code converts to a
/// hash-free shape before serializing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert a new user and return the generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on failure; a duplicate email surfaces as a
/// UNIQUE violation (see [`DbError::is_unique_violation`]).
pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Look up a user by email, returning `None` when absent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, name, created_at, updated_at \
         FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Look up a user by id, returning `None` when absent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, name, created_at, updated_at \
         FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// True when `email` belongs to a user other than `user_id`.
///
/// Used by profile updates to reject address takeovers before writing.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn email_taken_by_other(
    pool: &SqlitePool,
    email: &str,
    user_id: i64,
) -> Result<bool, DbError> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ? AND id != ?")
        .bind(email)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(existing.is_some())
}

/// Update a user's name and email, bumping `updated_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matched, [`DbError::Sqlx`] on
/// other failures.
pub async fn update_profile(
    pool: &SqlitePool,
    user_id: i64,
    name: &str,
    email: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE users SET name = ?, email = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(name)
    .bind(email)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Replace a user's password hash, bumping `updated_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row matched, [`DbError::Sqlx`] on
/// other failures.
pub async fn update_password(
    pool: &SqlitePool,
    user_id: i64,
    password_hash: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE users SET password_hash = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(password_hash)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
