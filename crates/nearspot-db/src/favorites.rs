//! CRUD for the `user_favorites` table.

use chrono::{DateTime, Utc};
use nearspot_core::PlaceKind;
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `user_favorites` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FavoriteRow {
    pub id: i64,
    pub user_id: i64,
    pub place_id: String,
    pub place_name: String,
    pub place_type: String,
    pub created_at: DateTime<Utc>,
}

/// Save a place as a favorite. Idempotent: re-saving an existing favorite
/// is a no-op and returns `false`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn add_favorite(
    pool: &SqlitePool,
    user_id: i64,
    place_id: &str,
    place_name: &str,
    kind: PlaceKind,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO user_favorites (user_id, place_id, place_name, place_type) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(place_id)
    .bind(place_name)
    .bind(kind.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove a favorite, returning `false` when nothing matched.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn remove_favorite(
    pool: &SqlitePool,
    user_id: i64,
    place_id: &str,
    kind: PlaceKind,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "DELETE FROM user_favorites WHERE user_id = ? AND place_id = ? AND place_type = ?",
    )
    .bind(user_id)
    .bind(place_id)
    .bind(kind.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// List a user's favorites, newest first, optionally filtered by kind.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_favorites(
    pool: &SqlitePool,
    user_id: i64,
    kind: Option<PlaceKind>,
) -> Result<Vec<FavoriteRow>, DbError> {
    let rows = if let Some(kind) = kind {
        sqlx::query_as::<_, FavoriteRow>(
            "SELECT id, user_id, place_id, place_name, place_type, created_at \
             FROM user_favorites WHERE user_id = ? AND place_type = ? \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, FavoriteRow>(
            "SELECT id, user_id, place_id, place_name, place_type, created_at \
             FROM user_favorites WHERE user_id = ? \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?
    };
    Ok(rows)
}

/// The user's most recent favorites, for the activity feed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn recent_favorites(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<FavoriteRow>, DbError> {
    let rows = sqlx::query_as::<_, FavoriteRow>(
        "SELECT id, user_id, place_id, place_name, place_type, created_at \
         FROM user_favorites WHERE user_id = ? \
         ORDER BY created_at DESC LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
