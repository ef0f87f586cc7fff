//! Cache dependency accumulator threaded through menu formatting.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::models::Menu;

/// Collects the cache tags a formatted response depends on.
///
/// Formats record every menu and link entity they touch; the route layer
/// stores the serialized response under the accumulated tags so upstream
/// invalidation reaches it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheableMetadata {
    tags: BTreeSet<String>,
}

impl CacheableMetadata {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw tag.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
    }

    /// Record a dependency on a menu.
    pub fn add_menu(&mut self, menu: &Menu) {
        self.add_tag(format!("menu:{}", menu.name));
    }

    /// Record a dependency on a menu link entity.
    pub fn add_link(&mut self, id: &Uuid) {
        self.add_tag(format!("menu_link:{id}"));
    }

    /// Absorb another accumulator's tags.
    pub fn merge(&mut self, other: &CacheableMetadata) {
        self.tags.extend(other.tags.iter().cloned());
    }

    /// All accumulated tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }

    /// Whether anything was recorded.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn menu(name: &str) -> Menu {
        Menu {
            id: Uuid::now_v7(),
            name: name.to_string(),
            label: name.to_string(),
            description: None,
            langcode: "en".to_string(),
        }
    }

    #[test]
    fn tags_deduplicate_and_sort() {
        let mut meta = CacheableMetadata::new();
        meta.add_menu(&menu("main"));
        meta.add_menu(&menu("main"));
        meta.add_tag("a");
        assert_eq!(meta.tags(), vec!["a".to_string(), "menu:main".to_string()]);
    }

    #[test]
    fn merge_unions_tags() {
        let mut a = CacheableMetadata::new();
        a.add_tag("one");
        let mut b = CacheableMetadata::new();
        b.add_tag("two");
        a.merge(&b);
        assert_eq!(a.tags(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn link_tags_embed_uuid() {
        let id = Uuid::now_v7();
        let mut meta = CacheableMetadata::new();
        meta.add_link(&id);
        assert_eq!(meta.tags(), vec![format!("menu_link:{id}")]);
    }
}
