//! Append-only log of the searches users run.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `search_history` table.
///
/// `user_id` is nullable: anonymous searches may be recorded too.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchHistoryRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub query: String,
    pub location: Option<String>,
    pub filters: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append a search to the history and return the generated id.
///
/// `filters` is an opaque serialized blob of whatever filter set the search
/// ran with.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn record_search(
    pool: &SqlitePool,
    user_id: Option<i64>,
    query: &str,
    location: Option<&str>,
    filters: Option<&str>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO search_history (user_id, query, location, filters) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(query)
    .bind(location)
    .bind(filters)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// The user's most recent searches, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn recent_searches(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<SearchHistoryRow>, DbError> {
    let rows = sqlx::query_as::<_, SearchHistoryRow>(
        "SELECT id, user_id, query, location, filters, created_at \
         FROM search_history WHERE user_id = ? \
         ORDER BY created_at DESC LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
