use axum::http::StatusCode;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use portal_api::{ApiResponse, Comment, CommentInput, Like, Paginated, Role};

use crate::error::{AppError, AppResult};
use crate::handlers::{ack, ok};
use crate::middleware::AuthenticatedUser;
use crate::state::{AppState, paginate};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentsQuery {
    article_id: i64,
    page: Option<u64>,
    per_page: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LikeStatus {
    like: Option<Like>,
}

pub(crate) async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentsQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse<Paginated<Comment>>>)> {
    let db = state.db.lock().expect("db lock poisoned");
    if !db.articles.iter().any(|article| article.id == query.article_id) {
        return Err(AppError::NotFound("article"));
    }

    let mut top_level: Vec<Comment> = db
        .comments
        .iter()
        .filter(|comment| comment.article_id == query.article_id && comment.parent_id.is_none())
        .map(|comment| db.hydrate_comment(comment))
        .collect();
    // Newest first, like the portal's comment feed.
    top_level.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let page = paginate(
        &top_level,
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(10),
    );
    Ok(ok(StatusCode::OK, "comments listed", page))
}

pub(crate) async fn list_replies(
    State(state): State<AppState>,
    Path(parent_id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<Paginated<Comment>>>)> {
    let db = state.db.lock().expect("db lock poisoned");
    if !db.comments.iter().any(|comment| comment.id == parent_id) {
        return Err(AppError::NotFound("comment"));
    }

    let mut replies: Vec<Comment> = db
        .comments
        .iter()
        .filter(|comment| comment.parent_id == Some(parent_id))
        .map(|comment| db.hydrate_comment(comment))
        .collect();
    // Oldest first: replies read as a conversation.
    replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let per_page = (replies.len() as u64).max(1);
    let page = paginate(&replies, 1, per_page);
    Ok(ok(StatusCode::OK, "replies listed", page))
}

pub(crate) async fn create_comment(
    State(state): State<AppState>,
    author: AuthenticatedUser,
    Json(input): Json<CommentInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Comment>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    if !db.articles.iter().any(|article| article.id == input.article_id) {
        return Err(AppError::NotFound("article"));
    }
    if let Some(parent_id) = input.parent_id
        && !db.comments.iter().any(|comment| comment.id == parent_id)
    {
        return Err(AppError::NotFound("parent comment"));
    }

    let now = Utc::now();
    let comment = Comment {
        id: db.next_id(),
        content: input.content,
        parent_id: input.parent_id,
        article_id: input.article_id,
        created_at: now,
        updated_at: now,
        is_edited: false,
        like_count: 0,
        child_count: 0,
        author: author.user,
        is_optimistic: false,
    };
    db.comments.push(comment.clone());

    let hydrated = db.hydrate_comment(&comment);
    Ok(ok(StatusCode::CREATED, "comment created", hydrated))
}

pub(crate) async fn delete_comment(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    let mut db = state.db.lock().expect("db lock poisoned");
    let comment = db
        .comments
        .iter()
        .find(|comment| comment.id == id)
        .cloned()
        .ok_or(AppError::NotFound("comment"))?;

    if comment.author.id != actor.user.id && actor.user.role != Role::Admin {
        return Err(AppError::BadRequest("only the author or an admin can delete".to_string()));
    }

    // The whole subtree goes, replies included.
    let mut doomed = vec![id];
    let mut cursor = 0;
    while cursor < doomed.len() {
        let parent = doomed[cursor];
        cursor += 1;
        doomed.extend(
            db.comments
                .iter()
                .filter(|comment| comment.parent_id == Some(parent))
                .map(|comment| comment.id),
        );
    }
    db.comments.retain(|comment| !doomed.contains(&comment.id));
    db.likes.retain(|like| !doomed.contains(&like.comment_id));

    Ok(ack(StatusCode::OK, "comment deleted"))
}

pub(crate) async fn like_comment(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<Like>>)> {
    let mut db = state.db.lock().expect("db lock poisoned");
    if !db.comments.iter().any(|comment| comment.id == id) {
        return Err(AppError::NotFound("comment"));
    }

    if let Some(existing) = db
        .likes
        .iter()
        .find(|like| like.comment_id == id && like.user_id == actor.user.id)
        .cloned()
    {
        return Ok(ok(StatusCode::OK, "already liked", existing));
    }

    let like = Like {
        id: db.next_id(),
        comment_id: id,
        user_id: actor.user.id,
        created_at: Utc::now(),
    };
    db.likes.push(like.clone());

    Ok(ok(StatusCode::CREATED, "comment liked", like))
}

pub(crate) async fn unlike_comment(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    let mut db = state.db.lock().expect("db lock poisoned");
    db.likes
        .retain(|like| !(like.comment_id == id && like.user_id == actor.user.id));
    Ok(ack(StatusCode::OK, "comment unliked"))
}

pub(crate) async fn like_status(
    State(state): State<AppState>,
    actor: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<LikeStatus>>)> {
    let db = state.db.lock().expect("db lock poisoned");
    let like = db
        .likes
        .iter()
        .find(|like| like.comment_id == id && like.user_id == actor.user.id)
        .cloned();
    Ok(ok(StatusCode::OK, "like status", LikeStatus { like }))
}
