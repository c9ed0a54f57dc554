use axum::http::StatusCode;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use validator::Validate;

use portal_api::{ApiResponse, Paginated, User, UserInput};

use crate::error::{AppError, AppResult};
use crate::handlers::articles::PageQuery;
use crate::handlers::{ack, ok};
use crate::state::{AppState, DEMO_PASSWORD, DemoUser, paginate};

pub(crate) async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse<Paginated<User>>>)> {
    let db = state.db.lock().expect("db lock poisoned");
    let users: Vec<User> = db.users.iter().map(|entry| entry.user.clone()).collect();
    let page = paginate(&users, query.page(), query.per_page());
    Ok(ok(StatusCode::OK, "users listed", page))
}

pub(crate) async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let db = state.db.lock().expect("db lock poisoned");
    let user = db.user_by_id(id).ok_or(AppError::NotFound("user"))?;
    Ok(ok(StatusCode::OK, "user found", user))
}

pub(crate) async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    if db.user_by_email(&input.email).is_some() {
        return Err(AppError::Conflict("email is already registered".to_string()));
    }

    let user = User {
        id: db.next_id(),
        email: input.email,
        name: input.name,
        role: input.role,
        verified: true,
        avatar_url: None,
        created_at: Utc::now(),
    };
    db.users.push(DemoUser {
        user: user.clone(),
        password: DEMO_PASSWORD.to_string(),
    });

    Ok(ok(StatusCode::CREATED, "user created", user))
}

pub(crate) async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UserInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    let entry = db
        .users
        .iter_mut()
        .find(|entry| entry.user.id == id)
        .ok_or(AppError::NotFound("user"))?;

    entry.user.name = input.name;
    entry.user.email = input.email;
    entry.user.role = input.role;

    Ok(ok(StatusCode::OK, "user updated", entry.user.clone()))
}

pub(crate) async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    let mut db = state.db.lock().expect("db lock poisoned");
    let before = db.users.len();
    db.users.retain(|entry| entry.user.id != id);
    if db.users.len() == before {
        return Err(AppError::NotFound("user"));
    }

    Ok(ack(StatusCode::OK, "user deleted"))
}
