//! In-memory store
//!
//! Implements both store traits over a single lock. Used by the router
//! and service tests and for running the API without a database. Order
//! assignment happens under the write lock, so it is atomic per scope.

use super::admin::AdminStore;
use super::catalog::{group_active_links, CatalogStore, LinkChanges, NewCategory, NewLink};
use crate::ordering::OrderScope;
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use link_catalog_shared::{Admin, Category, CategoryWithLinks, Link, LinkWithCategory};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    categories: BTreeMap<i64, Category>,
    links: BTreeMap<i64, Link>,
    admins: BTreeMap<i64, Admin>,
    next_category_id: i64,
    next_link_id: i64,
    next_admin_id: i64,
}

impl MemoryState {
    fn max_order(&self, scope: OrderScope) -> Option<i32> {
        match scope {
            OrderScope::Categories => self.categories.values().map(|c| c.order).max(),
            OrderScope::Links { category_id } => self
                .links
                .values()
                .filter(|l| l.category_id == category_id)
                .map(|l| l.order)
                .max(),
        }
    }

    fn sorted_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.categories.values().cloned().collect();
        categories.sort_by_key(|c| (c.order, c.id));
        categories
    }

    fn active_links(&self, category_id: Option<i64>) -> Vec<Link> {
        let mut links: Vec<Link> = self
            .links
            .values()
            .filter(|l| l.is_active && category_id.map_or(true, |id| l.category_id == id))
            .cloned()
            .collect();
        links.sort_by_key(|l| (l.category_id, l.order, l.id));
        links
    }

    fn with_category(&self, link: &Link) -> Option<LinkWithCategory> {
        self.categories
            .get(&link.category_id)
            .map(|category| LinkWithCategory {
                link: link.clone(),
                category: category.clone(),
            })
    }
}

/// Store keeping every table in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn max_order(&self, scope: OrderScope) -> Result<Option<i32>> {
        Ok(self.state.read().await.max_order(scope))
    }

    async fn insert_category(&self, input: NewCategory) -> Result<Category> {
        let mut state = self.state.write().await;
        let order = input.order.resolve(state.max_order(OrderScope::Categories));

        state.next_category_id += 1;
        let category = Category {
            id: state.next_category_id,
            name: input.name,
            order,
        };
        state.categories.insert(category.id, category.clone());

        Ok(category)
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn find_category_with_active_links(&self, id: i64) -> Result<Option<CategoryWithLinks>> {
        let state = self.state.read().await;
        Ok(state.categories.get(&id).map(|category| CategoryWithLinks {
            category: category.clone(),
            links: state.active_links(Some(id)),
        }))
    }

    async fn update_category(&self, id: i64, name: &str, order: i32) -> Result<Option<Category>> {
        let mut state = self.state.write().await;
        Ok(state.categories.get_mut(&id).map(|category| {
            category.name = name.to_string();
            category.order = order;
            category.clone()
        }))
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.categories.remove(&id).is_none() {
            return Ok(false);
        }
        state.links.retain(|_, link| link.category_id != id);
        Ok(true)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.state.read().await.sorted_categories())
    }

    async fn list_categories_with_active_links(
        &self,
        include_empty: bool,
    ) -> Result<Vec<CategoryWithLinks>> {
        let state = self.state.read().await;
        Ok(group_active_links(
            state.sorted_categories(),
            state.active_links(None),
            include_empty,
        ))
    }

    async fn insert_link(&self, input: NewLink) -> Result<Link> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&input.category_id) {
            bail!("foreign key violation: category {} does not exist", input.category_id);
        }

        let scope = OrderScope::Links {
            category_id: input.category_id,
        };
        let order = input.order.resolve(state.max_order(scope));
        let now = Utc::now();

        state.next_link_id += 1;
        let link = Link {
            id: state.next_link_id,
            title: input.title,
            url: input.url,
            image_url: input.image_url,
            price: input.price,
            price_str: input.price_str,
            order,
            is_active: input.is_active,
            category_id: input.category_id,
            created_at: now,
            updated_at: now,
        };
        state.links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn find_link_in_category(&self, category_id: i64, link_id: i64) -> Result<Option<Link>> {
        Ok(self
            .state
            .read()
            .await
            .links
            .get(&link_id)
            .filter(|l| l.category_id == category_id)
            .cloned())
    }

    async fn find_link_with_category(&self, id: i64) -> Result<Option<LinkWithCategory>> {
        let state = self.state.read().await;
        Ok(state.links.get(&id).and_then(|link| state.with_category(link)))
    }

    async fn update_link(
        &self,
        category_id: i64,
        link_id: i64,
        changes: LinkChanges,
    ) -> Result<Option<Link>> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&changes.category_id) {
            bail!("foreign key violation: category {} does not exist", changes.category_id);
        }

        let Some(link) = state
            .links
            .get_mut(&link_id)
            .filter(|l| l.category_id == category_id)
        else {
            return Ok(None);
        };

        link.title = changes.title;
        link.url = changes.url;
        link.image_url = changes.image_url;
        link.price = changes.price;
        link.price_str = changes.price_str;
        link.order = changes.order;
        link.is_active = changes.is_active;
        link.category_id = changes.category_id;
        link.updated_at = Utc::now();

        Ok(Some(link.clone()))
    }

    async fn delete_link(&self, category_id: i64, link_id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        let owned = state
            .links
            .get(&link_id)
            .is_some_and(|l| l.category_id == category_id);
        if owned {
            state.links.remove(&link_id);
        }
        Ok(owned)
    }

    async fn list_links(&self) -> Result<Vec<Link>> {
        // BTreeMap iteration is already by id
        Ok(self.state.read().await.links.values().cloned().collect())
    }

    async fn list_links_with_category(&self) -> Result<Vec<LinkWithCategory>> {
        let state = self.state.read().await;
        let mut links: Vec<LinkWithCategory> = state
            .links
            .values()
            .filter_map(|link| state.with_category(link))
            .collect();
        links.sort_by_key(|l| (l.link.category_id, l.link.order, l.link.id));
        Ok(links)
    }

    async fn list_active_links(&self, category_id: i64) -> Result<Vec<Link>> {
        Ok(self.state.read().await.active_links(Some(category_id)))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>> {
        Ok(self
            .state
            .read()
            .await
            .admins
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Admin>> {
        Ok(self.state.read().await.admins.get(&id).cloned())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(match state.admins.get_mut(&id) {
            Some(admin) => {
                admin.password_hash = password_hash.to_string();
                admin.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.state.read().await.admins.len() as i64)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<Admin> {
        let mut state = self.state.write().await;
        if state.admins.values().any(|a| a.username == username) {
            bail!("unique violation: admin {} already exists", username);
        }

        let now = Utc::now();
        state.next_admin_id += 1;
        let admin = Admin {
            id: state.next_admin_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.admins.insert(admin.id, admin.clone());

        Ok(admin)
    }
}
