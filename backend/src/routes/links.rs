//! Link API routes
//!
//! Mutations are addressed through the owning category; a link id that
//! belongs to another category is reported as not found.

use crate::error::ApiResult;
use crate::extract::{parse_id, AppJson};
use crate::services::CatalogService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use link_catalog_shared::{Link, LinkRequest, LinkWithCategory, MessageResponse};

/// Link management routes
pub fn admin_link_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links))
        .route("/links/all", get(list_links_with_category))
        .route("/links/:id", get(get_link))
        .route(
            "/categories/:category_id/links",
            get(list_category_links).post(create_link),
        )
        .route(
            "/categories/:category_id/links/:link_id",
            patch(update_link).delete(delete_link),
        )
}

/// GET /api/links
async fn list_links(State(state): State<AppState>) -> ApiResult<Json<Vec<Link>>> {
    Ok(Json(CatalogService::list_links(state.catalog()).await?))
}

/// GET /api/links/all - every link with its category
async fn list_links_with_category(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LinkWithCategory>>> {
    Ok(Json(
        CatalogService::list_links_with_category(state.catalog()).await?,
    ))
}

/// GET /api/links/:id
async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LinkWithCategory>> {
    let id = parse_id(&id, "ID")?;
    Ok(Json(CatalogService::get_link(state.catalog(), id).await?))
}

/// GET /api/categories/:category_id/links - active links only
async fn list_category_links(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> ApiResult<Json<Vec<Link>>> {
    let category_id = parse_id(&category_id, "category ID")?;
    Ok(Json(
        CatalogService::list_active_links_for_category(state.catalog(), category_id).await?,
    ))
}

/// POST /api/categories/:category_id/links
async fn create_link(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    AppJson(req): AppJson<LinkRequest>,
) -> ApiResult<(StatusCode, Json<Link>)> {
    let category_id = parse_id(&category_id, "category ID")?;
    let link = CatalogService::create_link(state.catalog(), category_id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// PATCH /api/categories/:category_id/links/:link_id
async fn update_link(
    State(state): State<AppState>,
    Path((category_id, link_id)): Path<(String, String)>,
    AppJson(req): AppJson<LinkRequest>,
) -> ApiResult<Json<Link>> {
    let category_id = parse_id(&category_id, "category ID")?;
    let link_id = parse_id(&link_id, "link ID")?;
    Ok(Json(
        CatalogService::update_link(state.catalog(), category_id, link_id, req.into()).await?,
    ))
}

/// DELETE /api/categories/:category_id/links/:link_id
async fn delete_link(
    State(state): State<AppState>,
    Path((category_id, link_id)): Path<(String, String)>,
) -> ApiResult<Json<MessageResponse>> {
    let category_id = parse_id(&category_id, "category ID")?;
    let link_id = parse_id(&link_id, "link ID")?;
    CatalogService::delete_link(state.catalog(), category_id, link_id).await?;
    Ok(Json(MessageResponse::new("Link deleted successfully")))
}
