//! Menu link content entity.
//!
//! Each row is one navigational link. Base columns cover the link descriptor
//! (destination, hierarchy, ordering); configurable fields added per menu
//! live in the `fields` JSONB bag, like item fields.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Provider tag for links backed by a content entity row.
pub const ENTITY_PROVIDER: &str = "menu_link_content";

const COLUMNS: &str = "id, menu_name, title, description, uri, route_name, route_parameters, \
     options, metadata, enabled, expanded, weight, parent, provider, fields, created, changed";

/// Menu link record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MenuLinkContent {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Menu machine name this link belongs to.
    pub menu_name: String,

    /// Display title.
    pub title: String,

    /// Optional description shown as link metadata.
    pub description: Option<String>,

    /// Raw destination URI ("internal:/about", "https://...", "entity:item/<uuid>").
    pub uri: Option<String>,

    /// Named route, for links that resolve through the host router.
    pub route_name: Option<String>,

    /// Route parameter mapping (JSONB).
    pub route_parameters: serde_json::Value,

    /// Free-form link options (JSONB).
    pub options: serde_json::Value,

    /// Free-form link metadata (JSONB).
    pub metadata: serde_json::Value,

    /// Whether the link is shown at all.
    pub enabled: bool,

    /// Whether the link's subtree renders expanded.
    pub expanded: bool,

    /// Sort weight (lower = higher priority).
    pub weight: i32,

    /// Parent plugin id ("provider:reference") or NULL for a root link.
    pub parent: Option<String>,

    /// Source that provides this link.
    pub provider: String,

    /// Configurable field storage (JSONB).
    pub fields: serde_json::Value,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub changed: i64,
}

impl MenuLinkContent {
    /// Opaque plugin id encoding the provider and the entity reference.
    pub fn plugin_id(&self) -> String {
        format!("{}:{}", self.provider, self.id)
    }

    /// Whether this link is backed by a dedicated content entity.
    pub fn is_entity_backed(&self) -> bool {
        self.provider == ENTITY_PROVIDER
    }

    /// Find a menu link by its UUID.
    pub async fn find_by_uuid(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let link = sqlx::query_as::<_, MenuLinkContent>(&format!(
            "SELECT {COLUMNS} FROM menu_link_content WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch menu link by uuid")?;

        Ok(link)
    }

    /// Find all links of a menu, ordered by weight then title.
    pub async fn find_by_menu(pool: &PgPool, menu_name: &str) -> Result<Vec<Self>> {
        let links = sqlx::query_as::<_, MenuLinkContent>(&format!(
            "SELECT {COLUMNS} FROM menu_link_content
             WHERE menu_name = $1
             ORDER BY weight ASC, title ASC"
        ))
        .bind(menu_name)
        .fetch_all(pool)
        .await
        .context("failed to fetch menu links by menu")?;

        Ok(links)
    }
}
