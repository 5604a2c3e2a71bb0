//! Catalog repository for categories and links

use crate::ordering::{OrderAssignment, OrderScope};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use link_catalog_shared::{Category, CategoryWithLinks, Link, LinkWithCategory};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use std::collections::HashMap;

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub order: OrderAssignment,
}

/// Input for creating a link
#[derive(Debug, Clone)]
pub struct NewLink {
    pub category_id: i64,
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub price: i64,
    pub price_str: Option<String>,
    pub order: OrderAssignment,
    pub is_active: bool,
}

/// Full replacement of a link's mutable fields
#[derive(Debug, Clone)]
pub struct LinkChanges {
    pub category_id: i64,
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub price: i64,
    pub price_str: Option<String>,
    pub order: i32,
    pub is_active: bool,
}

/// Persistence operations for categories and links
///
/// Every listing is sorted by `order` and then `id`. Inserts given
/// `OrderAssignment::Next` must compute the order and write the row as
/// one atomic step per scope.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Largest order in `scope`, `None` when the scope is empty
    async fn max_order(&self, scope: OrderScope) -> Result<Option<i32>>;

    async fn insert_category(&self, input: NewCategory) -> Result<Category>;
    async fn find_category(&self, id: i64) -> Result<Option<Category>>;
    async fn find_category_with_active_links(&self, id: i64) -> Result<Option<CategoryWithLinks>>;
    async fn update_category(&self, id: i64, name: &str, order: i32) -> Result<Option<Category>>;
    /// Deletes the category and, through the foreign key, its links
    async fn delete_category(&self, id: i64) -> Result<bool>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    /// Categories with their active links; empty ones only if `include_empty`
    async fn list_categories_with_active_links(
        &self,
        include_empty: bool,
    ) -> Result<Vec<CategoryWithLinks>>;

    async fn insert_link(&self, input: NewLink) -> Result<Link>;
    async fn find_link_in_category(&self, category_id: i64, link_id: i64) -> Result<Option<Link>>;
    async fn find_link_with_category(&self, id: i64) -> Result<Option<LinkWithCategory>>;
    async fn update_link(
        &self,
        category_id: i64,
        link_id: i64,
        changes: LinkChanges,
    ) -> Result<Option<Link>>;
    async fn delete_link(&self, category_id: i64, link_id: i64) -> Result<bool>;
    /// All links sorted by id
    async fn list_links(&self) -> Result<Vec<Link>>;
    /// All links with their category, sorted by category id then order
    async fn list_links_with_category(&self) -> Result<Vec<LinkWithCategory>>;
    async fn list_active_links(&self, category_id: i64) -> Result<Vec<Link>>;

    async fn health_check(&self) -> Result<()>;
}

/// Attach active links to their categories, keeping both orderings
///
/// `links` must already be sorted for display.
pub fn group_active_links(
    categories: Vec<Category>,
    links: Vec<Link>,
    include_empty: bool,
) -> Vec<CategoryWithLinks> {
    let mut by_category: HashMap<i64, Vec<Link>> = HashMap::new();
    for link in links.into_iter().filter(|l| l.is_active) {
        by_category.entry(link.category_id).or_default().push(link);
    }

    categories
        .into_iter()
        .map(|category| {
            let links = by_category.remove(&category.id).unwrap_or_default();
            CategoryWithLinks { category, links }
        })
        .filter(|c| include_empty || !c.links.is_empty())
        .collect()
}

// ============================================================================
// PostgreSQL
// ============================================================================

/// Category record from database
#[derive(Debug, Clone, sqlx::FromRow)]
struct CategoryRecord {
    id: i64,
    name: String,
    order: i32,
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Category {
            id: r.id,
            name: r.name,
            order: r.order,
        }
    }
}

/// Link record from database
#[derive(Debug, Clone, sqlx::FromRow)]
struct LinkRecord {
    id: i64,
    title: String,
    url: String,
    image_url: Option<String>,
    price: i64,
    price_str: Option<String>,
    order: i32,
    is_active: bool,
    category_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRecord> for Link {
    fn from(r: LinkRecord) -> Self {
        Link {
            id: r.id,
            title: r.title,
            url: r.url,
            image_url: r.image_url,
            price: r.price,
            price_str: r.price_str,
            order: r.order,
            is_active: r.is_active,
            category_id: r.category_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Link joined with its category
#[derive(Debug, Clone, sqlx::FromRow)]
struct LinkWithCategoryRecord {
    #[sqlx(flatten)]
    link: LinkRecord,
    category_name: String,
    category_order: i32,
}

impl From<LinkWithCategoryRecord> for LinkWithCategory {
    fn from(r: LinkWithCategoryRecord) -> Self {
        let category = Category {
            id: r.link.category_id,
            name: r.category_name,
            order: r.category_order,
        };
        LinkWithCategory {
            link: r.link.into(),
            category,
        }
    }
}

/// PostgreSQL-backed catalog store
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn max_order_with<'e, E>(executor: E, scope: OrderScope) -> Result<Option<i32>>
    where
        E: PgExecutor<'e>,
    {
        let max = match scope {
            OrderScope::Categories => {
                sqlx::query_scalar::<_, Option<i32>>(r#"SELECT MAX("order") FROM categories"#)
                    .fetch_one(executor)
                    .await?
            }
            OrderScope::Links { category_id } => {
                sqlx::query_scalar::<_, Option<i32>>(
                    r#"SELECT MAX("order") FROM links WHERE category_id = $1"#,
                )
                .bind(category_id)
                .fetch_one(executor)
                .await?
            }
        };

        Ok(max)
    }

    /// Resolve an order inside `tx`, holding the scope lock until commit
    async fn resolve_order(
        tx: &mut Transaction<'_, Postgres>,
        scope: OrderScope,
        assignment: OrderAssignment,
    ) -> Result<i32> {
        if let OrderAssignment::Explicit(order) = assignment {
            return Ok(order);
        }

        let (class, key) = scope.lock_key();
        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(class)
            .bind(key)
            .execute(&mut **tx)
            .await?;

        let current_max = Self::max_order_with(&mut **tx, scope).await?;
        Ok(assignment.resolve(current_max))
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn max_order(&self, scope: OrderScope) -> Result<Option<i32>> {
        Self::max_order_with(&self.pool, scope).await
    }

    async fn insert_category(&self, input: NewCategory) -> Result<Category> {
        let mut tx = self.pool.begin().await?;
        let order = Self::resolve_order(&mut tx, OrderScope::Categories, input.order).await?;

        let record = sqlx::query_as::<_, CategoryRecord>(
            r#"
            INSERT INTO categories (name, "order")
            VALUES ($1, $2)
            RETURNING id, name, "order"
            "#,
        )
        .bind(&input.name)
        .bind(order)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record.into())
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            r#"SELECT id, name, "order" FROM categories WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn find_category_with_active_links(&self, id: i64) -> Result<Option<CategoryWithLinks>> {
        let Some(category) = self.find_category(id).await? else {
            return Ok(None);
        };

        let links = self.list_active_links(id).await?;
        Ok(Some(CategoryWithLinks { category, links }))
    }

    async fn update_category(&self, id: i64, name: &str, order: i32) -> Result<Option<Category>> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            r#"
            UPDATE categories SET name = $2, "order" = $3
            WHERE id = $1
            RETURNING id, name, "order"
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(order)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM categories WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            r#"SELECT id, name, "order" FROM categories ORDER BY "order" ASC, id ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn list_categories_with_active_links(
        &self,
        include_empty: bool,
    ) -> Result<Vec<CategoryWithLinks>> {
        let categories = self.list_categories().await?;

        let links = sqlx::query_as::<_, LinkRecord>(
            r#"
            SELECT id, title, url, image_url, price, price_str, "order",
                   is_active, category_id, created_at, updated_at
            FROM links
            WHERE is_active = TRUE
            ORDER BY category_id ASC, "order" ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(group_active_links(
            categories,
            links.into_iter().map(Into::into).collect(),
            include_empty,
        ))
    }

    async fn insert_link(&self, input: NewLink) -> Result<Link> {
        let mut tx = self.pool.begin().await?;
        let scope = OrderScope::Links {
            category_id: input.category_id,
        };
        let order = Self::resolve_order(&mut tx, scope, input.order).await?;

        let record = sqlx::query_as::<_, LinkRecord>(
            r#"
            INSERT INTO links (
                title, url, image_url, price, price_str, "order", is_active, category_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, url, image_url, price, price_str, "order",
                      is_active, category_id, created_at, updated_at
            "#,
        )
        .bind(&input.title)
        .bind(&input.url)
        .bind(&input.image_url)
        .bind(input.price)
        .bind(&input.price_str)
        .bind(order)
        .bind(input.is_active)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record.into())
    }

    async fn find_link_in_category(&self, category_id: i64, link_id: i64) -> Result<Option<Link>> {
        let record = sqlx::query_as::<_, LinkRecord>(
            r#"
            SELECT id, title, url, image_url, price, price_str, "order",
                   is_active, category_id, created_at, updated_at
            FROM links
            WHERE id = $1 AND category_id = $2
            "#,
        )
        .bind(link_id)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn find_link_with_category(&self, id: i64) -> Result<Option<LinkWithCategory>> {
        let record = sqlx::query_as::<_, LinkWithCategoryRecord>(
            r#"
            SELECT l.id, l.title, l.url, l.image_url, l.price, l.price_str, l."order",
                   l.is_active, l.category_id, l.created_at, l.updated_at,
                   c.name AS category_name, c."order" AS category_order
            FROM links l
            JOIN categories c ON c.id = l.category_id
            WHERE l.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn update_link(
        &self,
        category_id: i64,
        link_id: i64,
        changes: LinkChanges,
    ) -> Result<Option<Link>> {
        let record = sqlx::query_as::<_, LinkRecord>(
            r#"
            UPDATE links SET
                title = $3,
                url = $4,
                image_url = $5,
                price = $6,
                price_str = $7,
                "order" = $8,
                is_active = $9,
                category_id = $10,
                updated_at = NOW()
            WHERE id = $1 AND category_id = $2
            RETURNING id, title, url, image_url, price, price_str, "order",
                      is_active, category_id, created_at, updated_at
            "#,
        )
        .bind(link_id)
        .bind(category_id)
        .bind(&changes.title)
        .bind(&changes.url)
        .bind(&changes.image_url)
        .bind(changes.price)
        .bind(&changes.price_str)
        .bind(changes.order)
        .bind(changes.is_active)
        .bind(changes.category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn delete_link(&self, category_id: i64, link_id: i64) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM links WHERE id = $1 AND category_id = $2"#)
            .bind(link_id)
            .bind(category_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_links(&self) -> Result<Vec<Link>> {
        let records = sqlx::query_as::<_, LinkRecord>(
            r#"
            SELECT id, title, url, image_url, price, price_str, "order",
                   is_active, category_id, created_at, updated_at
            FROM links
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn list_links_with_category(&self) -> Result<Vec<LinkWithCategory>> {
        let records = sqlx::query_as::<_, LinkWithCategoryRecord>(
            r#"
            SELECT l.id, l.title, l.url, l.image_url, l.price, l.price_str, l."order",
                   l.is_active, l.category_id, l.created_at, l.updated_at,
                   c.name AS category_name, c."order" AS category_order
            FROM links l
            JOIN categories c ON c.id = l.category_id
            ORDER BY l.category_id ASC, l."order" ASC, l.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn list_active_links(&self, category_id: i64) -> Result<Vec<Link>> {
        let records = sqlx::query_as::<_, LinkRecord>(
            r#"
            SELECT id, title, url, image_url, price, price_str, "order",
                   is_active, category_id, created_at, updated_at
            FROM links
            WHERE category_id = $1 AND is_active = TRUE
            ORDER BY "order" ASC, id ASC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn health_check(&self) -> Result<()> {
        crate::db::health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, order: i32) -> Category {
        Category {
            id,
            name: format!("category-{}", id),
            order,
        }
    }

    fn link(id: i64, category_id: i64, order: i32, is_active: bool) -> Link {
        Link {
            id,
            title: format!("link-{}", id),
            url: "http://x".to_string(),
            image_url: None,
            price: 0,
            price_str: None,
            order,
            is_active,
            category_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_group_active_links_keeps_order_and_drops_inactive() {
        let categories = vec![category(1, 1), category(2, 2)];
        let links = vec![
            link(10, 1, 1, true),
            link(11, 1, 2, false),
            link(12, 1, 3, true),
            link(20, 2, 1, false),
        ];

        let grouped = group_active_links(categories, links, true);

        assert_eq!(grouped.len(), 2);
        let ids: Vec<i64> = grouped[0].links.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![10, 12]);
        assert!(grouped[1].links.is_empty());
    }

    #[test]
    fn test_group_active_links_excludes_empty() {
        let categories = vec![category(1, 1), category(2, 2)];
        let links = vec![link(10, 1, 1, true), link(20, 2, 1, false)];

        let grouped = group_active_links(categories, links, false);

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].category.id, 1);
    }
}
