//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result, bail};

/// Format name served when `MENU_ITEMS_FORMAT` is unset.
pub const DEFAULT_FORMAT: &str = "json_api";

/// How formatting treats a menu link whose backing entity no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedLinkPolicy {
    /// Drop the link (and, in nested output, its subtree).
    Skip,

    /// Emit the link from its tree descriptor alone, flagged as unresolved.
    Placeholder,

    /// Abort the formatting pass.
    Fail,
}

impl UnresolvedLinkPolicy {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "skip" => Ok(Self::Skip),
            "placeholder" => Ok(Self::Placeholder),
            "fail" => Ok(Self::Fail),
            other => {
                bail!("UNRESOLVED_LINK_POLICY must be skip, placeholder, or fail (got '{other}')")
            }
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Redis connection URL.
    pub redis_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Public site URL used to resolve internal link URIs.
    pub site_url: String,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Active menu items format, read per request ("json_api" or "nested").
    pub menu_items_format: String,

    /// Policy for links whose backing entity is missing (default: placeholder).
    pub unresolved_link_policy: UnresolvedLinkPolicy,

    /// Key menu link resource types by menu name instead of one shared type.
    pub per_menu_resource_types: bool,

    /// Merge configurable entity fields into nested menu items.
    pub expose_link_fields: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let site_url = env::var("SITE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let menu_items_format =
            env::var("MENU_ITEMS_FORMAT").unwrap_or_else(|_| DEFAULT_FORMAT.to_string());

        let unresolved_link_policy = env::var("UNRESOLVED_LINK_POLICY")
            .map(|v| UnresolvedLinkPolicy::parse(&v))
            .unwrap_or(Ok(UnresolvedLinkPolicy::Placeholder))?;

        let per_menu_resource_types = parse_bool_var("PER_MENU_RESOURCE_TYPES", false)?;
        let expose_link_fields = parse_bool_var("EXPOSE_LINK_FIELDS", true)?;

        Ok(Self {
            port,
            database_url,
            redis_url,
            database_max_connections,
            site_url,
            cors_allowed_origins,
            menu_items_format,
            unresolved_link_policy,
            per_menu_resource_types,
            expose_link_fields,
        })
    }
}

fn parse_bool_var(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(v) => match v.as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => bail!("{name} must be a boolean (got '{other}')"),
        },
    }
}
