//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::cache::CacheLayer;
use crate::config::Config;
use crate::db;
use crate::format::{FlatJsonApiFormat, FormatRegistry, MenuItemsFormat, NestedFormat};
use crate::jsonapi::{DefaultNormalizer, FieldNormalizer, ResourceTypeRepository};
use crate::menu_tree::MenuLinkTree;
use crate::models::{MenuRepository, PgMenuRepository};
use crate::resource::MenuResourceAssembler;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Two-tier cache layer (Moka L1 + Redis L2).
    cache: CacheLayer,

    /// Application configuration.
    config: Config,

    /// Menu and menu link storage.
    menus: Arc<dyn MenuRepository>,

    /// Menu link tree provider.
    tree: MenuLinkTree,

    /// Menu items format registry.
    formats: FormatRegistry,

    /// Top-level document assembler.
    assembler: MenuResourceAssembler,
}

impl AppState {
    /// Initialize application state: connect to PostgreSQL and Redis, make
    /// sure the schema exists, and wire up the services.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config).await?;
        db::ensure_schema(&pool).await?;

        let redis =
            RedisClient::open(config.redis_url.as_str()).context("invalid REDIS_URL")?;

        let menus: Arc<dyn MenuRepository> = Arc::new(PgMenuRepository::new(pool.clone()));
        Ok(Self::with_repository(config.clone(), pool, redis, menus))
    }

    /// Wire up services over an existing pool, Redis client, and repository.
    ///
    /// Tests use this with an in-memory repository.
    pub fn with_repository(
        config: Config,
        db: PgPool,
        redis: RedisClient,
        menus: Arc<dyn MenuRepository>,
    ) -> Self {
        let cache = CacheLayer::new(redis);

        let resource_types = Arc::new(ResourceTypeRepository::new(config.per_menu_resource_types));
        let normalizer: Arc<dyn FieldNormalizer> = Arc::new(DefaultNormalizer);

        let flat = FlatJsonApiFormat::new(
            menus.clone(),
            resource_types.clone(),
            normalizer.clone(),
            config.unresolved_link_policy,
        );
        let nested = NestedFormat::new(
            menus.clone(),
            resource_types.clone(),
            normalizer,
            config.unresolved_link_policy,
            config.expose_link_fields,
            config.site_url.clone(),
        );
        let formats: Vec<Arc<dyn MenuItemsFormat>> = vec![Arc::new(flat), Arc::new(nested)];
        let formats = FormatRegistry::new(formats);

        let tree = MenuLinkTree::new(menus.clone());
        let assembler = MenuResourceAssembler::new(resource_types);

        Self {
            inner: Arc::new(AppStateInner {
                db,
                cache,
                config,
                menus,
                tree,
                formats,
                assembler,
            }),
        }
    }

    /// Get the database pool.
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get the cache layer.
    pub fn cache(&self) -> &CacheLayer {
        &self.inner.cache
    }

    /// Get the application configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the menu repository.
    pub fn menus(&self) -> &Arc<dyn MenuRepository> {
        &self.inner.menus
    }

    /// Get the menu link tree provider.
    pub fn tree(&self) -> &MenuLinkTree {
        &self.inner.tree
    }

    /// Get the format registry.
    pub fn formats(&self) -> &FormatRegistry {
        &self.inner.formats
    }

    /// Get the document assembler.
    pub fn assembler(&self) -> &MenuResourceAssembler {
        &self.inner.assembler
    }
}
