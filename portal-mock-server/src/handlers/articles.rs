use axum::http::StatusCode;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use portal_api::{ApiResponse, Article, ArticleInput, Paginated};

use crate::error::{AppError, AppResult};
use crate::handlers::{ack, ok};
use crate::middleware::AuthenticatedUser;
use crate::state::{AppState, paginate, slugify};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageQuery {
    page: Option<u64>,
    per_page: Option<u64>,
}

impl PageQuery {
    pub(crate) fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }

    pub(crate) fn per_page(&self) -> u64 {
        self.per_page.unwrap_or(10)
    }
}

pub(crate) async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse<Paginated<Article>>>)> {
    let db = state.db.lock().expect("db lock poisoned");
    let mut articles = db.articles.clone();
    articles.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let page = paginate(&articles, query.page(), query.per_page());
    Ok(ok(StatusCode::OK, "articles listed", page))
}

pub(crate) async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<Article>>)> {
    let db = state.db.lock().expect("db lock poisoned");
    let article = db
        .articles
        .iter()
        .find(|article| article.id == id)
        .cloned()
        .ok_or(AppError::NotFound("article"))?;
    Ok(ok(StatusCode::OK, "article found", article))
}

pub(crate) async fn create_article(
    State(state): State<AppState>,
    author: AuthenticatedUser,
    Json(input): Json<ArticleInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Article>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    let category = db
        .categories
        .iter()
        .find(|category| category.id == input.category_id)
        .cloned()
        .ok_or(AppError::NotFound("category"))?;
    let tags = db
        .tags
        .iter()
        .filter(|tag| input.tag_ids.contains(&tag.id))
        .cloned()
        .collect();

    let now = Utc::now();
    let article = Article {
        id: db.next_id(),
        slug: slugify(&input.title),
        title: input.title,
        content: input.content,
        cover_url: input.cover_url,
        category,
        tags,
        author: author.user,
        created_at: now,
        updated_at: now,
    };
    db.articles.push(article.clone());

    Ok(ok(StatusCode::CREATED, "article created", article))
}

pub(crate) async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ArticleInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Article>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    let category = db
        .categories
        .iter()
        .find(|category| category.id == input.category_id)
        .cloned()
        .ok_or(AppError::NotFound("category"))?;
    let tags: Vec<_> = db
        .tags
        .iter()
        .filter(|tag| input.tag_ids.contains(&tag.id))
        .cloned()
        .collect();

    let article = db
        .articles
        .iter_mut()
        .find(|article| article.id == id)
        .ok_or(AppError::NotFound("article"))?;

    article.slug = slugify(&input.title);
    article.title = input.title;
    article.content = input.content;
    article.cover_url = input.cover_url;
    article.category = category;
    article.tags = tags;
    article.updated_at = Utc::now();

    Ok(ok(StatusCode::OK, "article updated", article.clone()))
}

pub(crate) async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    let mut db = state.db.lock().expect("db lock poisoned");
    let before = db.articles.len();
    db.articles.retain(|article| article.id != id);
    if db.articles.len() == before {
        return Err(AppError::NotFound("article"));
    }

    // Comments and likes of a deleted article go with it.
    let orphaned: Vec<i64> = db
        .comments
        .iter()
        .filter(|comment| comment.article_id == id)
        .map(|comment| comment.id)
        .collect();
    db.comments.retain(|comment| comment.article_id != id);
    db.likes.retain(|like| !orphaned.contains(&like.comment_id));

    Ok(ack(StatusCode::OK, "article deleted"))
}
