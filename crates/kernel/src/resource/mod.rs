//! Menu resource document assembly.

use std::sync::Arc;

use serde_json::json;

use crate::format::MenuItemsPayload;
use crate::jsonapi::{JsonApiDocument, ResourceObject, ResourceTypeRepository};
use crate::models::Menu;

/// Builds the top-level document for a menu.
///
/// The primary resource is the menu entity itself; the formatted items ride
/// along as one extra `menu_items` attribute. No secondary resources are
/// ever produced.
pub struct MenuResourceAssembler {
    resource_types: Arc<ResourceTypeRepository>,
}

impl MenuResourceAssembler {
    /// Create an assembler.
    pub fn new(resource_types: Arc<ResourceTypeRepository>) -> Self {
        Self { resource_types }
    }

    /// Wrap formatted menu items into a single top-level document.
    pub fn assemble(
        &self,
        menu: &Menu,
        items: MenuItemsPayload,
    ) -> serde_json::Result<JsonApiDocument> {
        let resource_type = self.resource_types.menu_type();
        let mut resource = ResourceObject::new(resource_type.type_name(), menu.id.to_string());

        let attributes = &mut resource.attributes;
        attributes.insert("name".to_string(), json!(menu.name));
        attributes.insert("label".to_string(), json!(menu.label));
        attributes.insert("description".to_string(), json!(menu.description));
        attributes.insert("langcode".to_string(), json!(menu.langcode));
        attributes.insert("menu_items".to_string(), serde_json::to_value(items)?);

        Ok(JsonApiDocument::single(resource))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn assembler() -> MenuResourceAssembler {
        MenuResourceAssembler::new(Arc::new(ResourceTypeRepository::new(false)))
    }

    fn menu() -> Menu {
        Menu {
            id: Uuid::now_v7(),
            name: "main".to_string(),
            label: "Main navigation".to_string(),
            description: None,
            langcode: "en".to_string(),
        }
    }

    #[test]
    fn menu_is_the_primary_resource() {
        let menu = menu();
        let doc = assembler()
            .assemble(&menu, MenuItemsPayload::Tree(Vec::new()))
            .unwrap();

        assert_eq!(doc.data.resource_type, "menu--menu");
        assert_eq!(doc.data.id, menu.id.to_string());
        assert!(doc.included.is_empty());
        assert!(doc.links.is_empty());
        assert!(doc.meta.is_empty());
    }

    #[test]
    fn empty_payload_yields_empty_menu_items() {
        let doc = assembler()
            .assemble(&menu(), MenuItemsPayload::Collection(Vec::new()))
            .unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["data"]["attributes"]["menu_items"], json!([]));
        assert_eq!(value["data"]["attributes"]["label"], "Main navigation");
    }
}
