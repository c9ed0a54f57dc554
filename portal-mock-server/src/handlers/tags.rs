use axum::http::StatusCode;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use portal_api::{ApiResponse, Paginated, Tag, TagInput};

use crate::error::{AppError, AppResult};
use crate::handlers::articles::PageQuery;
use crate::handlers::{ack, ok};
use crate::state::{AppState, paginate, slugify};

pub(crate) async fn list_tags(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse<Paginated<Tag>>>)> {
    let db = state.db.lock().expect("db lock poisoned");
    let page = paginate(&db.tags, query.page(), query.per_page());
    Ok(ok(StatusCode::OK, "tags listed", page))
}

pub(crate) async fn create_tag(
    State(state): State<AppState>,
    Json(input): Json<TagInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Tag>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    if db.tags.iter().any(|tag| tag.name == input.name) {
        return Err(AppError::Conflict("tag already exists".to_string()));
    }

    let tag = Tag {
        id: db.next_id(),
        slug: slugify(&input.name),
        name: input.name,
    };
    db.tags.push(tag.clone());

    Ok(ok(StatusCode::CREATED, "tag created", tag))
}

pub(crate) async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TagInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Tag>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    let tag = db
        .tags
        .iter_mut()
        .find(|tag| tag.id == id)
        .ok_or(AppError::NotFound("tag"))?;

    tag.slug = slugify(&input.name);
    tag.name = input.name;

    Ok(ok(StatusCode::OK, "tag updated", tag.clone()))
}

pub(crate) async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    let mut db = state.db.lock().expect("db lock poisoned");
    let before = db.tags.len();
    db.tags.retain(|tag| tag.id != id);
    if db.tags.len() == before {
        return Err(AppError::NotFound("tag"));
    }

    for article in &mut db.articles {
        article.tags.retain(|tag| tag.id != id);
    }

    Ok(ack(StatusCode::OK, "tag deleted"))
}
