//! Pluggable menu items output formats.
//!
//! A format turns a loaded, filtered, sorted link tree into the
//! `menu_items` payload of the menu document. The set of formats is fixed
//! at process start: a name-keyed registry replaces runtime plugin
//! discovery, and configuration picks one per request.

mod json_api;
mod nested;

pub use json_api::{FORMAT_JSON_API, FlatJsonApiFormat};
pub use nested::{FORMAT_NESTED, NestedFormat};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::cache::CacheableMetadata;
use crate::config::UnresolvedLinkPolicy;
use crate::jsonapi::ResourceObject;
use crate::menu_tree::{LinkPluginId, MenuLinkNode, MenuTreeElement, PluginIdError};
use crate::models::{Menu, MenuLinkContent, MenuRepository};

/// Formatting failures.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Requested format has no registered strategy.
    #[error("no menu items format registered under '{0}'")]
    UnknownFormat(String),

    /// An entity-backed link references an entity that no longer exists.
    #[error("menu link '{plugin_id}' references missing entity {entity_id}")]
    UnresolvedLink { plugin_id: String, entity_id: Uuid },

    /// A link id could not be decoded.
    #[error(transparent)]
    PluginId(#[from] PluginIdError),

    /// Storage failure while resolving link entities.
    #[error("menu link storage failure: {0}")]
    Storage(#[source] anyhow::Error),
}

/// One nested menu item: its attribute record plus its subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    /// Flat attribute record (title, url, weight, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,

    /// Ordered child items (empty for leaves).
    pub below: Vec<MenuItem>,
}

/// Output payload of a format strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MenuItemsPayload {
    /// Flat resource collection in pre-order.
    Collection(Vec<ResourceObject>),

    /// Nested item tree with inline attributes.
    Tree(Vec<MenuItem>),
}

impl MenuItemsPayload {
    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Collection(items) => items.len(),
            Self::Tree(items) => items.len(),
        }
    }

    /// Whether the payload has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A menu items output format.
#[async_trait]
pub trait MenuItemsFormat: Send + Sync {
    /// Registry name of this format.
    fn name(&self) -> &'static str;

    /// Render a tree into this format's payload, recording cache
    /// dependencies along the way.
    async fn format(
        &self,
        menu: &Menu,
        tree: &[MenuTreeElement],
        cache: &mut CacheableMetadata,
    ) -> Result<MenuItemsPayload, FormatError>;
}

impl std::fmt::Debug for dyn MenuItemsFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItemsFormat")
            .field("name", &self.name())
            .finish()
    }
}

/// Name-keyed registry of the built-in formats, resolved once at startup.
pub struct FormatRegistry {
    formats: HashMap<&'static str, Arc<dyn MenuItemsFormat>>,
}

impl FormatRegistry {
    /// Build a registry from format instances, keyed by their names.
    pub fn new(formats: Vec<Arc<dyn MenuItemsFormat>>) -> Self {
        let mut map: HashMap<&'static str, Arc<dyn MenuItemsFormat>> = HashMap::new();
        for format in formats {
            if map.insert(format.name(), format.clone()).is_some() {
                warn!(name = %format.name(), "duplicate menu items format, keeping the last");
            }
        }
        Self { formats: map }
    }

    /// Look up a format by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn MenuItemsFormat>, FormatError> {
        self.formats
            .get(name)
            .cloned()
            .ok_or_else(|| FormatError::UnknownFormat(name.to_string()))
    }

    /// Registered format names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.formats.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Outcome of decoding a node id and resolving its backing entity.
pub(crate) enum ResolvedLink {
    /// Node is backed by this entity.
    Entity(MenuLinkContent),

    /// Node is defined statically by its provider; nothing to resolve.
    Static,

    /// Node is entity-backed but the entity is gone; the policy said not to
    /// abort, so the caller decides between skipping and a placeholder.
    Missing,
}

/// Decode a node id and resolve its backing entity.
///
/// A missing entity logs exactly one warning per node and either aborts
/// (policy `Fail`) or defers the skip/placeholder decision to the caller.
pub(crate) async fn resolve_link(
    repo: &dyn MenuRepository,
    node: &MenuLinkNode,
    policy: UnresolvedLinkPolicy,
) -> Result<ResolvedLink, FormatError> {
    let plugin_id: LinkPluginId = node.id.parse()?;

    let Some(entity_id) = plugin_id.entity_uuid()? else {
        return Ok(ResolvedLink::Static);
    };

    match repo
        .link_by_uuid(entity_id)
        .await
        .map_err(FormatError::Storage)?
    {
        Some(entity) => Ok(ResolvedLink::Entity(entity)),
        None => {
            warn!(link = %node.id, entity = %entity_id, "menu link references a missing entity");
            if policy == UnresolvedLinkPolicy::Fail {
                return Err(FormatError::UnresolvedLink {
                    plugin_id: node.id.clone(),
                    entity_id,
                });
            }
            Ok(ResolvedLink::Missing)
        }
    }
}

/// Configurable fields of a link entity, in stable name order.
///
/// Base columns are not part of the bag; computed values never reach
/// storage. Anything other than an object bag yields no fields.
pub(crate) fn configurable_fields(entity: &MenuLinkContent) -> Vec<(&String, &Value)> {
    let Some(bag) = entity.fields.as_object() else {
        return Vec::new();
    };
    let mut fields: Vec<(&String, &Value)> = bag.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    fields
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    struct NullFormat(&'static str);

    #[async_trait]
    impl MenuItemsFormat for NullFormat {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn format(
            &self,
            _menu: &Menu,
            _tree: &[MenuTreeElement],
            _cache: &mut CacheableMetadata,
        ) -> Result<MenuItemsPayload, FormatError> {
            Ok(MenuItemsPayload::Tree(Vec::new()))
        }
    }

    #[test]
    fn registry_resolves_by_name() {
        let registry = FormatRegistry::new(vec![
            Arc::new(NullFormat("json_api")),
            Arc::new(NullFormat("nested")),
        ]);
        assert!(registry.get("nested").is_ok());
        assert_eq!(registry.names(), vec!["json_api", "nested"]);
    }

    #[test]
    fn registry_rejects_unknown_names() {
        let registry = FormatRegistry::new(vec![Arc::new(NullFormat("json_api"))]);
        let err = registry.get("xml").unwrap_err();
        assert!(matches!(err, FormatError::UnknownFormat(name) if name == "xml"));
    }

    #[test]
    fn payload_len_counts_top_level_entries() {
        let payload = MenuItemsPayload::Collection(Vec::new());
        assert!(payload.is_empty());

        let payload = MenuItemsPayload::Tree(vec![MenuItem {
            attributes: Map::new(),
            below: Vec::new(),
        }]);
        assert_eq!(payload.len(), 1);
    }
}
