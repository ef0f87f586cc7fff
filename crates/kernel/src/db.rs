//! Database connection pool management.

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;

/// Create a PostgreSQL connection pool.
pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    Ok(pool)
}

/// Check if the database connection is healthy.
pub async fn check_health(pool: &PgPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// Create the menu tables if they do not exist yet.
///
/// Menus are config entities keyed by machine name; menu links hang off a
/// menu by name and keep their configurable fields in a JSONB bag.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS menu (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            label TEXT NOT NULL,
            description TEXT,
            langcode TEXT NOT NULL DEFAULT 'en'
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create menu table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS menu_link_content (
            id UUID PRIMARY KEY,
            menu_name TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            uri TEXT,
            route_name TEXT,
            route_parameters JSONB NOT NULL DEFAULT '{}',
            options JSONB NOT NULL DEFAULT '{}',
            metadata JSONB NOT NULL DEFAULT '{}',
            enabled BOOLEAN NOT NULL DEFAULT TRUE,
            expanded BOOLEAN NOT NULL DEFAULT FALSE,
            weight INT4 NOT NULL DEFAULT 0,
            parent TEXT,
            provider TEXT NOT NULL DEFAULT 'menu_link_content',
            fields JSONB NOT NULL DEFAULT '{}',
            created INT8 NOT NULL,
            changed INT8 NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create menu_link_content table")?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS menu_link_content_menu_name_idx
         ON menu_link_content (menu_name, weight, title)",
    )
    .execute(pool)
    .await
    .context("failed to create menu_link_content index")?;

    Ok(())
}
