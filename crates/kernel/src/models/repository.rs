//! Storage seam for menus and menu links.
//!
//! Formatting code depends on this trait rather than on the pool directly so
//! tests can substitute an in-memory implementation.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Menu, MenuLinkContent};

/// Read access to menus and their links.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Look up a menu by machine name.
    async fn menu_by_name(&self, name: &str) -> Result<Option<Menu>>;

    /// All links of a menu, ordered by weight then title.
    async fn links_in_menu(&self, menu_name: &str) -> Result<Vec<MenuLinkContent>>;

    /// Resolve one link entity by its UUID.
    async fn link_by_uuid(&self, id: Uuid) -> Result<Option<MenuLinkContent>>;
}

/// PostgreSQL-backed repository.
pub struct PgMenuRepository {
    pool: PgPool,
}

impl PgMenuRepository {
    /// Create a repository over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    async fn menu_by_name(&self, name: &str) -> Result<Option<Menu>> {
        Menu::find_by_name(&self.pool, name).await
    }

    async fn links_in_menu(&self, menu_name: &str) -> Result<Vec<MenuLinkContent>> {
        MenuLinkContent::find_by_menu(&self.pool, menu_name).await
    }

    async fn link_by_uuid(&self, id: Uuid) -> Result<Option<MenuLinkContent>> {
        MenuLinkContent::find_by_uuid(&self.pool, id).await
    }
}
