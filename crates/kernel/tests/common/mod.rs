#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]
//! Common test utilities for integration tests.
//!
//! Provides an in-memory [`MenuRepository`] so formatting runs against the
//! real kernel code without PostgreSQL. Links registered with
//! [`InMemoryMenuRepository::with_ghost_link`] appear in the menu tree but
//! cannot be resolved as entities, which exercises the unresolved-link
//! policies.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use sentiero_kernel::models::{Menu, MenuLinkContent, MenuRepository};

/// In-memory repository backing menus and links with plain maps.
#[derive(Default)]
pub struct InMemoryMenuRepository {
    menus: HashMap<String, Menu>,
    rows: Vec<MenuLinkContent>,
    entities: HashMap<Uuid, MenuLinkContent>,
}

impl InMemoryMenuRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a menu.
    pub fn with_menu(mut self, menu: Menu) -> Self {
        self.menus.insert(menu.name.clone(), menu);
        self
    }

    /// Register a link that appears in the tree and resolves as an entity.
    pub fn with_link(mut self, link: MenuLinkContent) -> Self {
        self.entities.insert(link.id, link.clone());
        self.rows.push(link);
        self
    }

    /// Register a link that appears in the tree but has no backing entity.
    pub fn with_ghost_link(mut self, link: MenuLinkContent) -> Self {
        self.rows.push(link);
        self
    }
}

#[async_trait]
impl MenuRepository for InMemoryMenuRepository {
    async fn menu_by_name(&self, name: &str) -> Result<Option<Menu>> {
        Ok(self.menus.get(name).cloned())
    }

    async fn links_in_menu(&self, menu_name: &str) -> Result<Vec<MenuLinkContent>> {
        let mut links: Vec<MenuLinkContent> = self
            .rows
            .iter()
            .filter(|l| l.menu_name == menu_name)
            .cloned()
            .collect();
        // Same ordering the SQL query applies.
        links.sort_by(|a, b| a.weight.cmp(&b.weight).then_with(|| a.title.cmp(&b.title)));
        Ok(links)
    }

    async fn link_by_uuid(&self, id: Uuid) -> Result<Option<MenuLinkContent>> {
        Ok(self.entities.get(&id).cloned())
    }
}

/// Build a menu with a fresh UUID.
pub fn menu(name: &str, label: &str) -> Menu {
    Menu {
        id: Uuid::now_v7(),
        name: name.to_string(),
        label: label.to_string(),
        description: None,
        langcode: "en".to_string(),
    }
}

/// Build an entity-backed root link.
pub fn link(menu_name: &str, title: &str, weight: i32) -> MenuLinkContent {
    MenuLinkContent {
        id: Uuid::now_v7(),
        menu_name: menu_name.to_string(),
        title: title.to_string(),
        description: None,
        uri: Some(format!("internal:/{}", title.to_lowercase().replace(' ', "-"))),
        route_name: None,
        route_parameters: json!({}),
        options: json!({}),
        metadata: json!({}),
        enabled: true,
        expanded: false,
        weight,
        parent: None,
        provider: "menu_link_content".to_string(),
        fields: json!({}),
        created: 1_700_000_000,
        changed: 1_700_000_000,
    }
}

/// Build a link provided statically (not backed by a content entity).
pub fn static_link(menu_name: &str, title: &str, weight: i32) -> MenuLinkContent {
    MenuLinkContent {
        provider: "system".to_string(),
        ..link(menu_name, title, weight)
    }
}

/// Re-parent a link under another link.
pub fn child_of(mut child: MenuLinkContent, parent: &MenuLinkContent) -> MenuLinkContent {
    child.parent = Some(parent.plugin_id());
    child
}
