//! Category API routes

use crate::error::ApiResult;
use crate::extract::{parse_id, AppJson};
use crate::services::CatalogService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use link_catalog_shared::{
    CategoriesWithLinksQuery, Category, CategoryRequest, CategoryWithLinks, MessageResponse,
};

/// Public catalog routes
pub fn public_category_routes() -> Router<AppState> {
    Router::new().route("/categories-with-links", get(list_categories_with_links))
}

/// Category management routes
pub fn admin_category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/category", post(create_category))
        .route(
            "/category/:id",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
}

/// GET /api/categories-with-links?includeEmpty=true
async fn list_categories_with_links(
    State(state): State<AppState>,
    Query(query): Query<CategoriesWithLinksQuery>,
) -> ApiResult<Json<Vec<CategoryWithLinks>>> {
    let categories =
        CatalogService::list_categories_with_links(state.catalog(), query.include_empty()).await?;
    Ok(Json(categories))
}

/// GET /api/categories
async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(CatalogService::list_categories(state.catalog()).await?))
}

/// GET /api/category/:id - category with its active links
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<CategoryWithLinks>> {
    let id = parse_id(&id, "ID")?;
    Ok(Json(CatalogService::get_category(state.catalog(), id).await?))
}

/// POST /api/category
async fn create_category(
    State(state): State<AppState>,
    AppJson(req): AppJson<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = CatalogService::create_category(state.catalog(), req.into()).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PATCH /api/category/:id
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<CategoryRequest>,
) -> ApiResult<Json<Category>> {
    let id = parse_id(&id, "ID")?;
    Ok(Json(
        CatalogService::update_category(state.catalog(), id, req.into()).await?,
    ))
}

/// DELETE /api/category/:id - also removes the category's links
async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "ID")?;
    CatalogService::delete_category(state.catalog(), id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
