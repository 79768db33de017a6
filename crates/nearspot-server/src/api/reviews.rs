//! User reviews of restaurants and hotels.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nearspot_core::PlaceKind;
use nearspot_db::{reviews, ReviewRow};

use crate::middleware::{CurrentUser, RequestId};

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ReviewBody {
    rating: i64,
    review_text: Option<String>,
    place_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MyReviewsQuery {
    #[serde(rename = "type")]
    place_type: Option<PlaceKind>,
}

#[derive(Debug, Serialize)]
pub struct ReviewItem {
    pub id: i64,
    pub place_id: String,
    pub place_name: String,
    pub place_type: String,
    pub rating: i64,
    pub review_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for ReviewItem {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: row.id,
            place_id: row.place_id,
            place_name: row.place_name,
            place_type: row.place_type,
            rating: row.rating,
            review_text: row.review_text,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn review_restaurant(
    state: State<AppState>,
    req_id: Extension<RequestId>,
    current: Extension<CurrentUser>,
    place_id: Path<String>,
    body: Json<ReviewBody>,
) -> Result<Json<ApiResponse<ReviewItem>>, ApiError> {
    add_review(state, req_id, current, place_id, body, PlaceKind::Restaurant).await
}

pub(super) async fn review_hotel(
    state: State<AppState>,
    req_id: Extension<RequestId>,
    current: Extension<CurrentUser>,
    place_id: Path<String>,
    body: Json<ReviewBody>,
) -> Result<Json<ApiResponse<ReviewItem>>, ApiError> {
    add_review(state, req_id, current, place_id, body, PlaceKind::Hotel).await
}

async fn add_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Path(place_id): Path<String>,
    Json(body): Json<ReviewBody>,
    kind: PlaceKind,
) -> Result<Json<ApiResponse<ReviewItem>>, ApiError> {
    if !(1..=5).contains(&body.rating) {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "rating must be between 1 and 5",
        ));
    }

    let place_name = body
        .place_name
        .unwrap_or_else(|| default_place_name(kind).to_string());

    let id = reviews::insert_review(
        &state.pool,
        current.id,
        &place_id,
        &place_name,
        kind,
        body.rating,
        body.review_text.as_deref(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ReviewItem {
            id,
            place_id,
            place_name,
            place_type: kind.as_str().to_string(),
            rating: body.rating,
            review_text: body.review_text,
            created_at: Utc::now(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn my_reviews(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<MyReviewsQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewItem>>>, ApiError> {
    let rows = reviews::list_reviews_for_user(&state.pool, current.id, query.place_type)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ReviewItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) fn default_place_name(kind: PlaceKind) -> &'static str {
    match kind {
        PlaceKind::Restaurant => "Unknown Restaurant",
        PlaceKind::Hotel => "Unknown Hotel",
        PlaceKind::Event => "Unknown Event",
    }
}
