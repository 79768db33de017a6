//! Account endpoints: registration, login, profile management, and the
//! activity feed.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nearspot_db::{favorites, reviews, search_history, users};

use crate::auth::{hash_password, verify_password};
use crate::middleware::{CurrentUser, RequestId};

use super::favorites::FavoriteItem;
use super::reviews::ReviewItem;
use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const MIN_PASSWORD_LEN: usize = 6;
const ACTIVITY_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub(super) struct RegisterBody {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginBody {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateProfileBody {
    name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChangePasswordBody {
    current_password: String,
    new_password: String,
}

#[derive(Debug, Serialize)]
pub(super) struct UserItem {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(super) struct SessionData {
    pub token: String,
    pub user: UserItem,
}

#[derive(Debug, Serialize)]
pub(super) struct ActivityData {
    pub reviews: Vec<ReviewItem>,
    pub favorites: Vec<FavoriteItem>,
    pub searches: Vec<SearchItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchItem {
    pub id: i64,
    pub query: String,
    pub location: Option<String>,
    pub filters: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub(super) async fn register(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<ApiResponse<SessionData>>, ApiError> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "name, email, and password are required",
        ));
    }
    if body.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "password must be at least 6 characters",
        ));
    }

    let password_hash = hash_password(&body.password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        ApiError::new(req_id.0.clone(), "internal_error", "failed to register user")
    })?;

    let user_id = match users::create_user(&state.pool, &body.name, &body.email, &password_hash)
        .await
    {
        Ok(user_id) => user_id,
        Err(e) if e.is_unique_violation() => {
            return Err(ApiError::new(
                req_id.0,
                "conflict",
                "a user with this email already exists",
            ));
        }
        Err(e) => return Err(map_db_error(req_id.0, &e)),
    };

    let token = issue_token(&state, &req_id.0, user_id, &body.email)?;

    Ok(Json(ApiResponse {
        data: SessionData {
            token,
            user: UserItem {
                id: user_id,
                name: body.name,
                email: body.email,
                created_at: None,
            },
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn login(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LoginBody>,
) -> Result<Json<ApiResponse<SessionData>>, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "email and password are required",
        ));
    }

    let user = users::find_by_email(&state.pool, &body.email)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    // A missing user and a wrong password are indistinguishable to callers.
    let Some(user) = user else {
        return Err(invalid_credentials(req_id.0));
    };
    if !verify_password(&body.password, &user.password_hash) {
        return Err(invalid_credentials(req_id.0));
    }

    let token = issue_token(&state, &req_id.0, user.id, &user.email)?;

    Ok(Json(ApiResponse {
        data: SessionData {
            token,
            user: UserItem {
                id: user.id,
                name: user.name,
                email: user.email,
                created_at: Some(user.created_at),
            },
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserItem>>, ApiError> {
    let user = users::find_by_id(&state.pool, current.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "user not found"))?;

    Ok(Json(ApiResponse {
        data: UserItem {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: Some(user.created_at),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn update_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<ApiResponse<UserItem>>, ApiError> {
    if body.name.trim().is_empty() || body.email.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "name and email are required",
        ));
    }

    let taken = users::email_taken_by_other(&state.pool, &body.email, current.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if taken {
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            "email already taken by another account",
        ));
    }

    users::update_profile(&state.pool, current.id, &body.name, &body.email)
        .await
        .map_err(|e| match e {
            nearspot_db::DbError::NotFound => {
                ApiError::new(req_id.0.clone(), "not_found", "user not found")
            }
            other => map_db_error(req_id.0.clone(), &other),
        })?;

    Ok(Json(ApiResponse {
        data: UserItem {
            id: current.id,
            name: body.name,
            email: body.email,
            created_at: None,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn change_password(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
    Json(body): Json<ChangePasswordBody>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if body.current_password.is_empty() || body.new_password.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "current and new password are required",
        ));
    }
    if body.new_password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "new password must be at least 6 characters",
        ));
    }

    let user = users::find_by_id(&state.pool, current.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "user not found"))?;

    if !verify_password(&body.current_password, &user.password_hash) {
        return Err(ApiError::new(
            req_id.0,
            "unauthorized",
            "current password is incorrect",
        ));
    }

    let new_hash = hash_password(&body.new_password).map_err(|e| {
        tracing::error!(error = %e, "password hashing failed");
        ApiError::new(req_id.0.clone(), "internal_error", "failed to change password")
    })?;
    users::update_password(&state.pool, current.id, &new_hash)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: serde_json::json!({ "changed": true }),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn activity(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ActivityData>>, ApiError> {
    let reviews = reviews::recent_reviews(&state.pool, current.id, ACTIVITY_LIMIT)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let favorites = favorites::recent_favorites(&state.pool, current.id, ACTIVITY_LIMIT)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let searches = search_history::recent_searches(&state.pool, current.id, ACTIVITY_LIMIT)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ActivityData {
            reviews: reviews.into_iter().map(ReviewItem::from).collect(),
            favorites: favorites.into_iter().map(FavoriteItem::from).collect(),
            searches: searches
                .into_iter()
                .map(|row| SearchItem {
                    id: row.id,
                    query: row.query,
                    location: row.location,
                    filters: row.filters,
                    created_at: row.created_at,
                })
                .collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn all_favorites(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<FavoriteItem>>>, ApiError> {
    let rows = favorites::list_favorites(&state.pool, current.id, None)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(FavoriteItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn issue_token(
    state: &AppState,
    request_id: &str,
    user_id: i64,
    email: &str,
) -> Result<String, ApiError> {
    state.auth.issue_token(user_id, email).map_err(|e| {
        tracing::error!(error = %e, "token signing failed");
        ApiError::new(request_id, "internal_error", "failed to issue token")
    })
}

fn invalid_credentials(request_id: String) -> ApiError {
    ApiError::new(request_id, "unauthorized", "invalid credentials")
}
