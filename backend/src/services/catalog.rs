//! Catalog service for categories and links
//!
//! Validates input and orchestrates the ordering rules and the store.
//! Lookups by id report `ApiError::NotFound`, kept separate from
//! `ApiError::Validation` so the two map to different status codes.
//!
//! Updates are full replacements: an omitted `order` is stored as 0 and
//! an omitted `is_active` as true, exactly as on create.

use crate::error::ApiError;
use crate::ordering::{self, OrderAssignment, OrderScope};
use crate::repositories::{CatalogStore, LinkChanges, NewCategory, NewLink};
use link_catalog_shared::validation::{validate_category_name, validate_link_fields};
use link_catalog_shared::{
    Category, CategoryRequest, CategoryWithLinks, Link, LinkRequest, LinkWithCategory,
};
use tracing::info;

/// Input for creating or replacing a category
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: String,
    pub order: Option<i32>,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(req: CategoryRequest) -> Self {
        Self {
            name: req.name,
            order: req.order,
        }
    }
}

/// Input for creating or replacing a link
#[derive(Debug, Clone, Default)]
pub struct LinkInput {
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub price: i64,
    pub price_str: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<LinkRequest> for LinkInput {
    fn from(req: LinkRequest) -> Self {
        Self {
            title: req.title,
            url: req.url,
            image_url: req.image_url,
            price: req.price,
            price_str: req.price_str,
            order: req.order,
            is_active: req.is_active,
        }
    }
}

/// Catalog service for business logic
pub struct CatalogService;

impl CatalogService {
    // ========================================================================
    // Categories
    // ========================================================================

    /// Next order a category created now would receive
    pub async fn next_order(store: &dyn CatalogStore, scope: OrderScope) -> Result<i32, ApiError> {
        ordering::next_order(store, scope)
            .await
            .map_err(ApiError::Internal)
    }

    /// Create a category, appending it when no positive order is given
    pub async fn create_category(
        store: &dyn CatalogStore,
        input: CategoryInput,
    ) -> Result<Category, ApiError> {
        validate_category_name(&input.name).map_err(ApiError::Validation)?;

        let category = store
            .insert_category(NewCategory {
                name: input.name,
                order: OrderAssignment::from_requested(input.order),
            })
            .await
            .map_err(ApiError::Internal)?;

        info!(category_id = category.id, order = category.order, "Category created");
        Ok(category)
    }

    /// Replace a category's name and order
    pub async fn update_category(
        store: &dyn CatalogStore,
        id: i64,
        input: CategoryInput,
    ) -> Result<Category, ApiError> {
        Self::require_category(store, id).await?;
        validate_category_name(&input.name).map_err(ApiError::Validation)?;

        let category = store
            .update_category(id, &input.name, input.order.unwrap_or(0))
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

        info!(category_id = id, order = category.order, "Category updated");
        Ok(category)
    }

    /// Delete a category together with all of its links
    pub async fn delete_category(store: &dyn CatalogStore, id: i64) -> Result<(), ApiError> {
        let deleted = store
            .delete_category(id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Category not found".to_string()));
        }

        info!(category_id = id, "Category deleted");
        Ok(())
    }

    /// Get a category with its active links
    pub async fn get_category(
        store: &dyn CatalogStore,
        id: i64,
    ) -> Result<CategoryWithLinks, ApiError> {
        store
            .find_category_with_active_links(id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))
    }

    /// All categories in display order
    pub async fn list_categories(store: &dyn CatalogStore) -> Result<Vec<Category>, ApiError> {
        store.list_categories().await.map_err(ApiError::Internal)
    }

    /// Public catalog: categories with their active links
    pub async fn list_categories_with_links(
        store: &dyn CatalogStore,
        include_empty: bool,
    ) -> Result<Vec<CategoryWithLinks>, ApiError> {
        store
            .list_categories_with_active_links(include_empty)
            .await
            .map_err(ApiError::Internal)
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Create a link in `category_id`, appending it when no positive order is given
    pub async fn create_link(
        store: &dyn CatalogStore,
        category_id: i64,
        input: LinkInput,
    ) -> Result<Link, ApiError> {
        validate_link_fields(&input.title, &input.url, category_id)
            .map_err(ApiError::Validation)?;
        Self::require_category(store, category_id).await?;

        let link = store
            .insert_link(NewLink {
                category_id,
                title: input.title,
                url: input.url,
                image_url: input.image_url,
                price: input.price,
                price_str: input.price_str,
                order: OrderAssignment::from_requested(input.order),
                is_active: input.is_active.unwrap_or(true),
            })
            .await
            .map_err(ApiError::Internal)?;

        info!(link_id = link.id, category_id, order = link.order, "Link created");
        Ok(link)
    }

    /// Replace every mutable field of a link in `category_id`
    pub async fn update_link(
        store: &dyn CatalogStore,
        category_id: i64,
        link_id: i64,
        input: LinkInput,
    ) -> Result<Link, ApiError> {
        let not_found = || ApiError::NotFound("Link not found in this category".to_string());

        store
            .find_link_in_category(category_id, link_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(not_found)?;

        validate_link_fields(&input.title, &input.url, category_id)
            .map_err(ApiError::Validation)?;

        let changes = LinkChanges {
            category_id,
            title: input.title,
            url: input.url,
            image_url: input.image_url,
            price: input.price,
            price_str: input.price_str,
            order: input.order.unwrap_or(0),
            is_active: input.is_active.unwrap_or(true),
        };

        let link = store
            .update_link(category_id, link_id, changes)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(not_found)?;

        info!(link_id, category_id, "Link updated");
        Ok(link)
    }

    /// Hard-delete a link in `category_id`
    pub async fn delete_link(
        store: &dyn CatalogStore,
        category_id: i64,
        link_id: i64,
    ) -> Result<(), ApiError> {
        let deleted = store
            .delete_link(category_id, link_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound(
                "Link not found in this category".to_string(),
            ));
        }

        info!(link_id, category_id, "Link deleted");
        Ok(())
    }

    /// Get a link with its category
    pub async fn get_link(store: &dyn CatalogStore, id: i64) -> Result<LinkWithCategory, ApiError> {
        store
            .find_link_with_category(id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Link not found".to_string()))
    }

    /// All links
    pub async fn list_links(store: &dyn CatalogStore) -> Result<Vec<Link>, ApiError> {
        store.list_links().await.map_err(ApiError::Internal)
    }

    /// All links with their category, grouped by category then order
    pub async fn list_links_with_category(
        store: &dyn CatalogStore,
    ) -> Result<Vec<LinkWithCategory>, ApiError> {
        store
            .list_links_with_category()
            .await
            .map_err(ApiError::Internal)
    }

    /// Active links of one category in display order
    pub async fn list_active_links_for_category(
        store: &dyn CatalogStore,
        category_id: i64,
    ) -> Result<Vec<Link>, ApiError> {
        Self::require_category(store, category_id).await?;

        store
            .list_active_links(category_id)
            .await
            .map_err(ApiError::Internal)
    }

    async fn require_category(store: &dyn CatalogStore, id: i64) -> Result<Category, ApiError> {
        store
            .find_category(id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))
    }
}
