//! Saved places: one row per (user, place), idempotent on re-save.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nearspot_core::PlaceKind;
use nearspot_db::{favorites, FavoriteRow};

use crate::middleware::{CurrentUser, RequestId};

use super::reviews::default_place_name;
use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Body of a save-favorite request. The place name is denormalized into the
/// row so listings render without a provider round-trip.
#[derive(Debug, Default, Deserialize)]
pub(super) struct FavoriteBody {
    place_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MyFavoritesQuery {
    #[serde(rename = "type")]
    place_type: Option<PlaceKind>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteItem {
    pub id: i64,
    pub place_id: String,
    pub place_name: String,
    pub place_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<FavoriteRow> for FavoriteItem {
    fn from(row: FavoriteRow) -> Self {
        Self {
            id: row.id,
            place_id: row.place_id,
            place_name: row.place_name,
            place_type: row.place_type,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct FavoriteChange {
    pub place_id: String,
    pub place_type: String,
    pub changed: bool,
}

pub(super) async fn favorite_restaurant(
    state: State<AppState>,
    req_id: Extension<RequestId>,
    current: Extension<CurrentUser>,
    place_id: Path<String>,
    body: Option<Json<FavoriteBody>>,
) -> Result<Json<ApiResponse<FavoriteChange>>, ApiError> {
    add(state, req_id, current, place_id, body, PlaceKind::Restaurant).await
}

pub(super) async fn unfavorite_restaurant(
    state: State<AppState>,
    req_id: Extension<RequestId>,
    current: Extension<CurrentUser>,
    place_id: Path<String>,
) -> Result<Json<ApiResponse<FavoriteChange>>, ApiError> {
    remove(state, req_id, current, place_id, PlaceKind::Restaurant).await
}

pub(super) async fn favorite_hotel(
    state: State<AppState>,
    req_id: Extension<RequestId>,
    current: Extension<CurrentUser>,
    place_id: Path<String>,
    body: Option<Json<FavoriteBody>>,
) -> Result<Json<ApiResponse<FavoriteChange>>, ApiError> {
    add(state, req_id, current, place_id, body, PlaceKind::Hotel).await
}

pub(super) async fn unfavorite_hotel(
    state: State<AppState>,
    req_id: Extension<RequestId>,
    current: Extension<CurrentUser>,
    place_id: Path<String>,
) -> Result<Json<ApiResponse<FavoriteChange>>, ApiError> {
    remove(state, req_id, current, place_id, PlaceKind::Hotel).await
}

pub(super) async fn favorite_event(
    state: State<AppState>,
    req_id: Extension<RequestId>,
    current: Extension<CurrentUser>,
    event_id: Path<String>,
    body: Option<Json<FavoriteBody>>,
) -> Result<Json<ApiResponse<FavoriteChange>>, ApiError> {
    add(state, req_id, current, event_id, body, PlaceKind::Event).await
}

pub(super) async fn unfavorite_event(
    state: State<AppState>,
    req_id: Extension<RequestId>,
    current: Extension<CurrentUser>,
    event_id: Path<String>,
) -> Result<Json<ApiResponse<FavoriteChange>>, ApiError> {
    remove(state, req_id, current, event_id, PlaceKind::Event).await
}

async fn add(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Path(place_id): Path<String>,
    body: Option<Json<FavoriteBody>>,
    kind: PlaceKind,
) -> Result<Json<ApiResponse<FavoriteChange>>, ApiError> {
    let place_name = body
        .and_then(|Json(b)| b.place_name)
        .unwrap_or_else(|| default_place_name(kind).to_string());

    let inserted = favorites::add_favorite(&state.pool, current.id, &place_id, &place_name, kind)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: FavoriteChange {
            place_id,
            place_type: kind.as_str().to_string(),
            changed: inserted,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn remove(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Path(place_id): Path<String>,
    kind: PlaceKind,
) -> Result<Json<ApiResponse<FavoriteChange>>, ApiError> {
    let removed = favorites::remove_favorite(&state.pool, current.id, &place_id, kind)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: FavoriteChange {
            place_id,
            place_type: kind.as_str().to_string(),
            changed: removed,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn my_favorites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<MyFavoritesQuery>,
) -> Result<Json<ApiResponse<Vec<FavoriteItem>>>, ApiError> {
    let rows = favorites::list_favorites(&state.pool, current.id, query.place_type)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(FavoriteItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
