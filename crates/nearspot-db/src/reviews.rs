//! CRUD for the `user_reviews` table.

use chrono::{DateTime, Utc};
use nearspot_core::PlaceKind;
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `user_reviews` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub user_id: i64,
    pub place_id: String,
    pub place_name: String,
    pub place_type: String,
    pub rating: i64,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert a review and return the generated id.
///
/// The schema enforces `rating` in 1..=5; callers validate first so a bad
/// rating is a 400, not a constraint error.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_review(
    pool: &SqlitePool,
    user_id: i64,
    place_id: &str,
    place_name: &str,
    kind: PlaceKind,
    rating: i64,
    review_text: Option<&str>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO user_reviews (user_id, place_id, place_name, place_type, rating, review_text) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(place_id)
    .bind(place_name)
    .bind(kind.as_str())
    .bind(rating)
    .bind(review_text)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// List a user's reviews, newest first, optionally filtered by kind.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews_for_user(
    pool: &SqlitePool,
    user_id: i64,
    kind: Option<PlaceKind>,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = if let Some(kind) = kind {
        sqlx::query_as::<_, ReviewRow>(
            "SELECT id, user_id, place_id, place_name, place_type, rating, review_text, created_at \
             FROM user_reviews WHERE user_id = ? AND place_type = ? \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, ReviewRow>(
            "SELECT id, user_id, place_id, place_name, place_type, rating, review_text, created_at \
             FROM user_reviews WHERE user_id = ? \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?
    };
    Ok(rows)
}

/// All reviews written for one place, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews_for_place(
    pool: &SqlitePool,
    place_id: &str,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, user_id, place_id, place_name, place_type, rating, review_text, created_at \
         FROM user_reviews WHERE place_id = ? \
         ORDER BY created_at DESC",
    )
    .bind(place_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// The user's most recent reviews, for the activity feed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn recent_reviews(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, user_id, place_id, place_name, place_type, rating, review_text, created_at \
         FROM user_reviews WHERE user_id = ? \
         ORDER BY created_at DESC LIMIT ?",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
