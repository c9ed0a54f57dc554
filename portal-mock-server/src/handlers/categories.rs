use axum::http::StatusCode;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use portal_api::{ApiResponse, Category, CategoryInput, Paginated};

use crate::error::{AppError, AppResult};
use crate::handlers::articles::PageQuery;
use crate::handlers::{ack, ok};
use crate::state::{AppState, paginate, slugify};

pub(crate) async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse<Paginated<Category>>>)> {
    let db = state.db.lock().expect("db lock poisoned");
    let page = paginate(&db.categories, query.page(), query.per_page());
    Ok(ok(StatusCode::OK, "categories listed", page))
}

pub(crate) async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    if db.categories.iter().any(|category| category.name == input.name) {
        return Err(AppError::Conflict("category already exists".to_string()));
    }

    let category = Category {
        id: db.next_id(),
        slug: slugify(&input.name),
        name: input.name,
    };
    db.categories.push(category.clone());

    Ok(ok(StatusCode::CREATED, "category created", category))
}

pub(crate) async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    input.validate()?;

    let mut db = state.db.lock().expect("db lock poisoned");
    let category = db
        .categories
        .iter_mut()
        .find(|category| category.id == id)
        .ok_or(AppError::NotFound("category"))?;

    category.slug = slugify(&input.name);
    category.name = input.name;

    Ok(ok(StatusCode::OK, "category updated", category.clone()))
}

pub(crate) async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<(StatusCode, Json<ApiResponse<serde_json::Value>>)> {
    let mut db = state.db.lock().expect("db lock poisoned");
    if db.articles.iter().any(|article| article.category.id == id) {
        return Err(AppError::Conflict("category is still in use".to_string()));
    }

    let before = db.categories.len();
    db.categories.retain(|category| category.id != id);
    if db.categories.len() == before {
        return Err(AppError::NotFound("category"));
    }

    Ok(ack(StatusCode::OK, "category deleted"))
}
