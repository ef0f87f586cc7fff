//! Tree assembly for menu links.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::models::{MenuLinkContent, MenuRepository};

/// Route descriptor attached to a menu link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Route name, when the link resolves through the host router.
    pub name: Option<String>,

    /// Route parameter mapping.
    pub parameters: Value,
}

impl Default for RouteDescriptor {
    fn default() -> Self {
        Self {
            name: None,
            parameters: Value::Object(serde_json::Map::new()),
        }
    }
}

/// One entry in a menu's hierarchical structure.
///
/// A lightweight descriptor of the link; the full entity (with configurable
/// fields) is re-resolved through the repository during formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuLinkNode {
    /// Opaque plugin id ("provider:reference").
    pub id: String,

    /// Display title.
    pub title: String,

    /// Optional description.
    pub description: Option<String>,

    /// Whether the link is shown at all.
    pub enabled: bool,

    /// Whether the link's subtree renders expanded.
    pub expanded: bool,

    /// Sort weight.
    pub weight: i32,

    /// Menu machine name.
    pub menu_name: String,

    /// Route descriptor.
    pub route: RouteDescriptor,

    /// Raw destination URI, when stored.
    pub uri: Option<String>,

    /// Free-form link options.
    pub options: Value,

    /// Source that provides this link.
    pub provider: String,

    /// Free-form link metadata.
    pub metadata: Value,

    /// Parent plugin id, or `None` for a root link.
    pub parent: Option<String>,
}

impl MenuLinkNode {
    /// Resolve the link destination into an absolute URL string.
    ///
    /// Internal scheme URIs are joined to the site URL; absolute URIs pass
    /// through. Links with no stored URI (pure route links) resolve at the
    /// host router, not here, and yield an empty string.
    pub fn resolved_url(&self, site_url: &str) -> String {
        let Some(uri) = &self.uri else {
            return String::new();
        };

        if let Some(path) = uri.strip_prefix("internal:") {
            return join_site(site_url, path);
        }
        if let Some(rest) = uri.strip_prefix("entity:") {
            return join_site(site_url, &format!("/{rest}"));
        }
        if let Some(path) = uri.strip_prefix("base:") {
            return join_site(site_url, &format!("/{}", path.trim_start_matches('/')));
        }
        if uri.starts_with("http://") || uri.starts_with("https://") || uri.starts_with("mailto:")
        {
            return uri.clone();
        }

        join_site(site_url, uri)
    }
}

fn join_site(site_url: &str, path: &str) -> String {
    match Url::parse(site_url).and_then(|base| base.join(path)) {
        Ok(url) => url.to_string(),
        Err(_) => format!(
            "{}/{}",
            site_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
    }
}

impl From<&MenuLinkContent> for MenuLinkNode {
    fn from(row: &MenuLinkContent) -> Self {
        Self {
            id: row.plugin_id(),
            title: row.title.clone(),
            description: row.description.clone(),
            enabled: row.enabled,
            expanded: row.expanded,
            weight: row.weight,
            menu_name: row.menu_name.clone(),
            route: RouteDescriptor {
                name: row.route_name.clone(),
                parameters: row.route_parameters.clone(),
            },
            uri: row.uri.clone(),
            options: row.options.clone(),
            provider: row.provider.clone(),
            metadata: row.metadata.clone(),
            parent: row.parent.clone(),
        }
    }
}

/// A link plus its ordered subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuTreeElement {
    /// The link descriptor.
    pub link: MenuLinkNode,

    /// Ordered child elements.
    pub subtree: Vec<MenuTreeElement>,
}

impl MenuTreeElement {
    /// Total number of nodes in a forest, all depths included.
    pub fn total_count(elements: &[MenuTreeElement]) -> usize {
        elements
            .iter()
            .map(|e| 1 + Self::total_count(&e.subtree))
            .sum()
    }
}

/// Tree manipulators, applied in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeManipulator {
    /// Drop disabled links together with their subtrees.
    FilterDisabled,

    /// Sort siblings by weight, then title, at every depth.
    SortByWeight,
}

/// Standard pipeline applied before formatting.
pub const DEFAULT_MANIPULATORS: &[TreeManipulator] =
    &[TreeManipulator::FilterDisabled, TreeManipulator::SortByWeight];

/// Loads and transforms menu link trees.
pub struct MenuLinkTree {
    repo: Arc<dyn MenuRepository>,
}

impl MenuLinkTree {
    /// Create a tree provider over a repository.
    pub fn new(repo: Arc<dyn MenuRepository>) -> Self {
        Self { repo }
    }

    /// Load the full link tree of a menu.
    pub async fn load(&self, menu_name: &str) -> Result<Vec<MenuTreeElement>> {
        let rows = self.repo.links_in_menu(menu_name).await?;
        Ok(assemble(rows))
    }

    /// Run a tree through an ordered manipulator pipeline.
    pub fn transform(
        &self,
        mut tree: Vec<MenuTreeElement>,
        manipulators: &[TreeManipulator],
    ) -> Vec<MenuTreeElement> {
        for manipulator in manipulators {
            tree = match manipulator {
                TreeManipulator::FilterDisabled => filter_disabled(tree),
                TreeManipulator::SortByWeight => {
                    sort_by_weight(&mut tree);
                    tree
                }
            };
        }
        tree
    }
}

/// Assemble flat rows into a forest, attaching children by parent plugin id.
///
/// Links whose parent is not part of the menu are promoted to roots. Links
/// only reachable through a parent cycle are dropped.
fn assemble(rows: Vec<MenuLinkContent>) -> Vec<MenuTreeElement> {
    let total = rows.len();
    let known: HashSet<String> = rows.iter().map(MenuLinkContent::plugin_id).collect();

    let mut roots: Vec<MenuLinkNode> = Vec::new();
    let mut children: HashMap<String, Vec<MenuLinkNode>> = HashMap::new();

    for row in &rows {
        let node = MenuLinkNode::from(row);
        match node.parent.clone() {
            Some(parent) if known.contains(&parent) => {
                children.entry(parent).or_default().push(node);
            }
            Some(parent) => {
                debug!(link = %node.id, parent = %parent, "parent not in menu, promoting to root");
                roots.push(node);
            }
            None => roots.push(node),
        }
    }

    let mut built = 0usize;
    let tree = attach(roots, &mut children, &mut built);

    if built < total {
        warn!(
            dropped = total - built,
            "menu links unreachable from any root (parent cycle), dropped"
        );
    }

    tree
}

fn attach(
    nodes: Vec<MenuLinkNode>,
    children: &mut HashMap<String, Vec<MenuLinkNode>>,
    built: &mut usize,
) -> Vec<MenuTreeElement> {
    nodes
        .into_iter()
        .map(|node| {
            *built += 1;
            let subtree = children
                .remove(&node.id)
                .map(|kids| attach(kids, children, built))
                .unwrap_or_default();
            MenuTreeElement {
                link: node,
                subtree,
            }
        })
        .collect()
}

fn filter_disabled(tree: Vec<MenuTreeElement>) -> Vec<MenuTreeElement> {
    tree.into_iter()
        .filter(|element| element.link.enabled)
        .map(|mut element| {
            element.subtree = filter_disabled(std::mem::take(&mut element.subtree));
            element
        })
        .collect()
}

fn sort_by_weight(tree: &mut [MenuTreeElement]) {
    tree.sort_by(|a, b| {
        a.link
            .weight
            .cmp(&b.link.weight)
            .then_with(|| a.link.title.cmp(&b.link.title))
    });
    for element in tree {
        sort_by_weight(&mut element.subtree);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(title: &str, weight: i32, parent: Option<String>) -> MenuLinkContent {
        MenuLinkContent {
            id: Uuid::now_v7(),
            menu_name: "main".to_string(),
            title: title.to_string(),
            description: None,
            uri: Some(format!("internal:/{}", title.to_lowercase())),
            route_name: None,
            route_parameters: serde_json::json!({}),
            options: serde_json::json!({}),
            metadata: serde_json::json!({}),
            enabled: true,
            expanded: false,
            weight,
            parent,
            provider: "menu_link_content".to_string(),
            fields: serde_json::json!({}),
            created: 0,
            changed: 0,
        }
    }

    #[test]
    fn assemble_builds_hierarchy() {
        let home = row("Home", 0, None);
        let about = row("About", 0, Some(home.plugin_id()));
        let team = row("Team", 0, Some(about.plugin_id()));

        let tree = assemble(vec![home, about, team]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].link.title, "Home");
        assert_eq!(tree[0].subtree.len(), 1);
        assert_eq!(tree[0].subtree[0].link.title, "About");
        assert_eq!(tree[0].subtree[0].subtree[0].link.title, "Team");
        assert_eq!(MenuTreeElement::total_count(&tree), 3);
    }

    #[test]
    fn assemble_promotes_orphans_to_root() {
        let orphan = row("Orphan", 0, Some("menu_link_content:gone".to_string()));
        let tree = assemble(vec![orphan]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].link.title, "Orphan");
    }

    #[test]
    fn assemble_drops_parent_cycles() {
        let mut a = row("A", 0, None);
        let mut b = row("B", 0, None);
        let a_id = a.plugin_id();
        let b_id = b.plugin_id();
        a.parent = Some(b_id);
        b.parent = Some(a_id);

        let tree = assemble(vec![a, b]);
        assert!(tree.is_empty());
    }

    #[test]
    fn filter_disabled_removes_subtree() {
        let mut section = row("Section", 0, None);
        section.enabled = false;
        let child = row("Child", 0, Some(section.plugin_id()));

        let tree = assemble(vec![section, child]);
        let filtered = filter_disabled(tree);
        assert!(filtered.is_empty());
    }

    #[test]
    fn sort_orders_by_weight_then_title() {
        let heavy = row("Alpha", 5, None);
        let light = row("Zulu", 1, None);
        let mid_b = row("Bravo", 3, None);
        let mid_a = row("Apple", 3, None);

        let mut tree = assemble(vec![heavy, light, mid_b, mid_a]);
        sort_by_weight(&mut tree);

        let titles: Vec<&str> = tree.iter().map(|e| e.link.title.as_str()).collect();
        assert_eq!(titles, vec!["Zulu", "Apple", "Bravo", "Alpha"]);
    }

    #[test]
    fn resolved_url_handles_schemes() {
        let mut link = row("Home", 0, None);

        link.uri = Some("internal:/about".to_string());
        let node = MenuLinkNode::from(&link);
        assert_eq!(node.resolved_url("https://example.com"), "https://example.com/about");

        link.uri = Some("https://other.example/x".to_string());
        let node = MenuLinkNode::from(&link);
        assert_eq!(node.resolved_url("https://example.com"), "https://other.example/x");

        link.uri = None;
        let node = MenuLinkNode::from(&link);
        assert_eq!(node.resolved_url("https://example.com"), "");
    }

    #[test]
    fn resolved_url_entity_scheme() {
        let mut link = row("Item", 0, None);
        let uuid = Uuid::now_v7();
        link.uri = Some(format!("entity:item/{uuid}"));
        let node = MenuLinkNode::from(&link);
        assert_eq!(
            node.resolved_url("https://example.com"),
            format!("https://example.com/item/{uuid}")
        );
    }
}
