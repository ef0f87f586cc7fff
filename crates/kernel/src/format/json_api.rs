//! Flat JSON:API collection format ("json_api").

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::cache::CacheableMetadata;
use crate::config::UnresolvedLinkPolicy;
use crate::jsonapi::{FieldNormalizer, ResourceObject, ResourceTypeRepository};
use crate::menu_tree::{MenuLinkNode, MenuTreeElement};
use crate::models::{Menu, MenuLinkContent, MenuRepository};

use super::{
    FormatError, MenuItemsFormat, MenuItemsPayload, ResolvedLink, configurable_fields,
    resolve_link,
};

/// Registry name of the flat format.
pub const FORMAT_JSON_API: &str = "json_api";

/// Flat resource-collection format.
///
/// Every node becomes its own top-level resource object. Output order is
/// pre-order: first-level items before their descendants, descendants
/// before subsequent siblings.
pub struct FlatJsonApiFormat {
    links: Arc<dyn MenuRepository>,
    resource_types: Arc<ResourceTypeRepository>,
    normalizer: Arc<dyn FieldNormalizer>,
    policy: UnresolvedLinkPolicy,
}

impl FlatJsonApiFormat {
    /// Create the format with its collaborators.
    pub fn new(
        links: Arc<dyn MenuRepository>,
        resource_types: Arc<ResourceTypeRepository>,
        normalizer: Arc<dyn FieldNormalizer>,
        policy: UnresolvedLinkPolicy,
    ) -> Self {
        Self {
            links,
            resource_types,
            normalizer,
            policy,
        }
    }

    fn collect<'a>(
        &'a self,
        elements: &'a [MenuTreeElement],
        cache: &'a mut CacheableMetadata,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ResourceObject>, FormatError>> + Send + 'a>> {
        Box::pin(async move {
            let mut items = Vec::new();
            for element in elements {
                match resolve_link(self.links.as_ref(), &element.link, self.policy).await? {
                    ResolvedLink::Entity(entity) => {
                        cache.add_link(&entity.id);
                        items.push(self.entity_resource(&entity));
                    }
                    ResolvedLink::Static => items.push(self.static_resource(&element.link)),
                    // Skip drops only this node; its descendants are
                    // independent top-level resources in a flat collection.
                    ResolvedLink::Missing => {
                        if self.policy == UnresolvedLinkPolicy::Placeholder {
                            items.push(self.placeholder_resource(&element.link));
                        }
                    }
                }
                items.extend(self.collect(&element.subtree, cache).await?);
            }
            Ok(items)
        })
    }

    fn entity_resource(&self, entity: &MenuLinkContent) -> ResourceObject {
        let resource_type = self.resource_types.menu_link_type(&entity.menu_name);
        let mut resource = ResourceObject::new(resource_type.type_name(), entity.id.to_string());

        let attributes = &mut resource.attributes;
        attributes.insert("menu_name".to_string(), json!(entity.menu_name));
        attributes.insert("title".to_string(), json!(entity.title));
        attributes.insert("description".to_string(), json!(entity.description));
        attributes.insert("enabled".to_string(), json!(entity.enabled));
        attributes.insert("expanded".to_string(), json!(entity.expanded));
        attributes.insert("weight".to_string(), json!(entity.weight));
        attributes.insert("parent".to_string(), json!(entity.parent));
        attributes.insert("uri".to_string(), json!(entity.uri));
        attributes.insert(
            "route".to_string(),
            json!({
                "name": entity.route_name,
                "parameters": entity.route_parameters,
            }),
        );
        attributes.insert("options".to_string(), entity.options.clone());

        for (name, value) in configurable_fields(entity) {
            attributes.insert(
                name.clone(),
                self.normalizer.normalize(&resource_type, name, value),
            );
        }

        resource
    }

    fn static_resource(&self, node: &MenuLinkNode) -> ResourceObject {
        let resource_type = self.resource_types.static_link_type(&node.provider);
        let mut resource = ResourceObject::new(resource_type.type_name(), node.id.clone());
        node_attributes(node, &mut resource.attributes);
        resource
    }

    fn placeholder_resource(&self, node: &MenuLinkNode) -> ResourceObject {
        let resource_type = self.resource_types.menu_link_type(&node.menu_name);
        let mut resource = ResourceObject::new(resource_type.type_name(), node.id.clone());
        node_attributes(node, &mut resource.attributes);

        let mut meta = Map::new();
        meta.insert("unresolved".to_string(), json!(true));
        resource.meta = Some(meta);
        resource
    }
}

fn node_attributes(node: &MenuLinkNode, attributes: &mut Map<String, Value>) {
    attributes.insert("menu_name".to_string(), json!(node.menu_name));
    attributes.insert("title".to_string(), json!(node.title));
    attributes.insert("description".to_string(), json!(node.description));
    attributes.insert("enabled".to_string(), json!(node.enabled));
    attributes.insert("expanded".to_string(), json!(node.expanded));
    attributes.insert("weight".to_string(), json!(node.weight));
    attributes.insert("parent".to_string(), json!(node.parent));
    attributes.insert("uri".to_string(), json!(node.uri));
    attributes.insert("route".to_string(), json!(node.route));
    attributes.insert("options".to_string(), node.options.clone());
}

#[async_trait]
impl MenuItemsFormat for FlatJsonApiFormat {
    fn name(&self) -> &'static str {
        FORMAT_JSON_API
    }

    async fn format(
        &self,
        menu: &Menu,
        tree: &[MenuTreeElement],
        cache: &mut CacheableMetadata,
    ) -> Result<MenuItemsPayload, FormatError> {
        cache.add_menu(menu);
        let items = self.collect(tree, cache).await?;
        Ok(MenuItemsPayload::Collection(items))
    }
}
