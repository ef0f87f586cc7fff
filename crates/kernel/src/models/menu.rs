//! Menu config entity.
//!
//! A menu is a named container for links ("main", "footer", ...). Its machine
//! name is the routing key; the UUID is the stable JSON:API resource id.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Menu record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Menu {
    /// Stable identifier (UUIDv7).
    pub id: Uuid,

    /// Machine name (e.g., "main", "footer").
    pub name: String,

    /// Human-readable label.
    pub label: String,

    /// Optional administrative description.
    pub description: Option<String>,

    /// Language code (default: 'en').
    pub langcode: String,
}

impl Menu {
    /// Find a menu by its machine name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>> {
        let menu = sqlx::query_as::<_, Menu>(
            "SELECT id, name, label, description, langcode FROM menu WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
        .context("failed to fetch menu by name")?;

        Ok(menu)
    }
}
