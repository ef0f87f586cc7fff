//! Resource type descriptors with per-menu memoization.

use std::sync::Arc;

use dashmap::DashMap;

use crate::models::menu_link::ENTITY_PROVIDER;

/// A named schema descriptor governing how an entity is exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    /// Entity type the descriptor covers.
    pub entity_type: String,

    /// Bundle within the entity type.
    pub bundle: String,
}

impl ResourceType {
    /// Create a descriptor for an entity type and bundle.
    pub fn new(entity_type: impl Into<String>, bundle: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            bundle: bundle.into(),
        }
    }

    /// Public type name ("entity_type--bundle").
    pub fn type_name(&self) -> String {
        format!("{}--{}", self.entity_type, self.bundle)
    }
}

/// Hands out resource type descriptors, memoized per lookup key.
///
/// Entries are idempotent and keyed by immutable names, so a racing
/// double-insert re-derives the same value.
pub struct ResourceTypeRepository {
    per_menu_types: bool,
    types: DashMap<String, Arc<ResourceType>>,
}

impl ResourceTypeRepository {
    /// Create a repository.
    ///
    /// With `per_menu_types` set, menu link descriptors are keyed by menu
    /// name; otherwise a single shared descriptor covers every menu.
    pub fn new(per_menu_types: bool) -> Self {
        Self {
            per_menu_types,
            types: DashMap::new(),
        }
    }

    /// Whether menu link resource types vary by menu name.
    pub fn per_menu_types(&self) -> bool {
        self.per_menu_types
    }

    /// Descriptor for entity-backed links of a menu.
    pub fn menu_link_type(&self, menu_name: &str) -> Arc<ResourceType> {
        let bundle = if self.per_menu_types {
            menu_name
        } else {
            ENTITY_PROVIDER
        };
        self.cached(&format!("content:{bundle}"), || {
            ResourceType::new(ENTITY_PROVIDER, bundle)
        })
    }

    /// Descriptor for links a provider defines statically.
    pub fn static_link_type(&self, provider: &str) -> Arc<ResourceType> {
        self.cached(&format!("static:{provider}"), || {
            ResourceType::new("menu_link", provider)
        })
    }

    /// Descriptor for the menu entity itself.
    pub fn menu_type(&self) -> Arc<ResourceType> {
        self.cached("menu", || ResourceType::new("menu", "menu"))
    }

    fn cached(&self, key: &str, build: impl FnOnce() -> ResourceType) -> Arc<ResourceType> {
        if let Some(existing) = self.types.get(key) {
            return existing.value().clone();
        }
        let descriptor = Arc::new(build());
        self.types.insert(key.to_string(), descriptor.clone());
        descriptor
    }
}
