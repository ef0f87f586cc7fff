//! Nested inline tree format ("nested").

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::cache::CacheableMetadata;
use crate::config::UnresolvedLinkPolicy;
use crate::jsonapi::{FieldNormalizer, ResourceTypeRepository};
use crate::menu_tree::{MenuLinkNode, MenuTreeElement};
use crate::models::{Menu, MenuLinkContent, MenuRepository};

use super::{
    FormatError, MenuItem, MenuItemsFormat, MenuItemsPayload, ResolvedLink, configurable_fields,
    resolve_link,
};

/// Registry name of the nested format.
pub const FORMAT_NESTED: &str = "nested";

/// Nested tree format.
///
/// Each item carries the full attribute record of its link inline, plus an
/// ordered `below` array holding its subtree (empty for leaves).
pub struct NestedFormat {
    links: Arc<dyn MenuRepository>,
    resource_types: Arc<ResourceTypeRepository>,
    normalizer: Arc<dyn FieldNormalizer>,
    policy: UnresolvedLinkPolicy,
    expose_link_fields: bool,
    site_url: String,
}

impl NestedFormat {
    /// Create the format with its collaborators.
    pub fn new(
        links: Arc<dyn MenuRepository>,
        resource_types: Arc<ResourceTypeRepository>,
        normalizer: Arc<dyn FieldNormalizer>,
        policy: UnresolvedLinkPolicy,
        expose_link_fields: bool,
        site_url: String,
    ) -> Self {
        Self {
            links,
            resource_types,
            normalizer,
            policy,
            expose_link_fields,
            site_url,
        }
    }

    fn build<'a>(
        &'a self,
        elements: &'a [MenuTreeElement],
        cache: &'a mut CacheableMetadata,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<MenuItem>, FormatError>> + Send + 'a>> {
        Box::pin(async move {
            let mut items = Vec::new();
            for element in elements {
                let mut attributes = self.node_attributes(&element.link);

                match resolve_link(self.links.as_ref(), &element.link, self.policy).await? {
                    ResolvedLink::Entity(entity) => {
                        cache.add_link(&entity.id);
                        attributes.insert("uri".to_string(), json!(entity.uri));
                        if self.expose_link_fields {
                            self.merge_entity_fields(&entity, &mut attributes);
                        }
                    }
                    ResolvedLink::Static => {}
                    ResolvedLink::Missing => {
                        // Skip drops the whole branch: children have no
                        // anchor in a nested tree.
                        if self.policy == UnresolvedLinkPolicy::Skip {
                            continue;
                        }
                        attributes.insert("unresolved".to_string(), json!(true));
                    }
                }

                let below = self.build(&element.subtree, cache).await?;
                items.push(MenuItem { attributes, below });
            }
            Ok(items)
        })
    }

    /// Flat attribute record of one link descriptor.
    ///
    /// `uri` stays null unless the node turns out to be entity-backed;
    /// `parent` is the parent plugin id or the empty string for roots.
    fn node_attributes(&self, node: &MenuLinkNode) -> Map<String, Value> {
        let mut attributes = Map::new();
        attributes.insert("id".to_string(), json!(node.id));
        attributes.insert("title".to_string(), json!(node.title));
        attributes.insert("description".to_string(), json!(node.description));
        attributes.insert("enabled".to_string(), json!(node.enabled));
        attributes.insert("expanded".to_string(), json!(node.expanded));
        attributes.insert("weight".to_string(), json!(node.weight));
        attributes.insert("menu_name".to_string(), json!(node.menu_name));
        attributes.insert("meta".to_string(), node.metadata.clone());
        attributes.insert("options".to_string(), node.options.clone());
        attributes.insert(
            "parent".to_string(),
            json!(node.parent.clone().unwrap_or_default()),
        );
        attributes.insert("provider".to_string(), json!(node.provider));
        attributes.insert(
            "route".to_string(),
            json!({
                "name": node.route.name,
                "parameters": node.route.parameters,
            }),
        );
        attributes.insert("url".to_string(), json!(node.resolved_url(&self.site_url)));
        attributes.insert("uri".to_string(), Value::Null);
        attributes
    }

    fn merge_entity_fields(&self, entity: &MenuLinkContent, attributes: &mut Map<String, Value>) {
        let resource_type = self.resource_types.menu_link_type(&entity.menu_name);
        for (name, value) in configurable_fields(entity) {
            attributes.insert(
                name.clone(),
                self.normalizer.normalize(&resource_type, name, value),
            );
        }
    }
}

#[async_trait]
impl MenuItemsFormat for NestedFormat {
    fn name(&self) -> &'static str {
        FORMAT_NESTED
    }

    async fn format(
        &self,
        menu: &Menu,
        tree: &[MenuTreeElement],
        cache: &mut CacheableMetadata,
    ) -> Result<MenuItemsPayload, FormatError> {
        cache.add_menu(menu);
        let items = self.build(tree, cache).await?;
        Ok(MenuItemsPayload::Tree(items))
    }
}
