#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Top-level document assembly tests.
//!
//! Runs the full load → transform → format → assemble pipeline and checks
//! the resulting JSON:API document shape.

mod common;

use std::sync::Arc;

use serde_json::{Value, json};

use common::{InMemoryMenuRepository, child_of, link, menu};
use sentiero_kernel::cache::CacheableMetadata;
use sentiero_kernel::config::UnresolvedLinkPolicy;
use sentiero_kernel::format::{FlatJsonApiFormat, MenuItemsFormat, NestedFormat};
use sentiero_kernel::jsonapi::{DefaultNormalizer, ResourceTypeRepository};
use sentiero_kernel::menu_tree::{DEFAULT_MANIPULATORS, MenuLinkTree};
use sentiero_kernel::models::{Menu, MenuRepository};
use sentiero_kernel::resource::MenuResourceAssembler;

async fn flat_document(repo: Arc<dyn MenuRepository>, menu: &Menu) -> Value {
    let resource_types = Arc::new(ResourceTypeRepository::new(false));
    let tree_provider = MenuLinkTree::new(repo.clone());
    let tree = tree_provider.load(&menu.name).await.unwrap();
    let tree = tree_provider.transform(tree, DEFAULT_MANIPULATORS);

    let format = FlatJsonApiFormat::new(
        repo,
        resource_types.clone(),
        Arc::new(DefaultNormalizer),
        UnresolvedLinkPolicy::Fail,
    );
    let mut cache = CacheableMetadata::new();
    let payload = format.format(menu, &tree, &mut cache).await.unwrap();

    let assembler = MenuResourceAssembler::new(resource_types);
    serde_json::to_value(assembler.assemble(menu, payload).unwrap()).unwrap()
}

async fn nested_document(repo: Arc<dyn MenuRepository>, menu: &Menu) -> Value {
    let resource_types = Arc::new(ResourceTypeRepository::new(false));
    let tree_provider = MenuLinkTree::new(repo.clone());
    let tree = tree_provider.load(&menu.name).await.unwrap();
    let tree = tree_provider.transform(tree, DEFAULT_MANIPULATORS);

    let format = NestedFormat::new(
        repo,
        resource_types.clone(),
        Arc::new(DefaultNormalizer),
        UnresolvedLinkPolicy::Fail,
        true,
        "https://example.com".to_string(),
    );
    let mut cache = CacheableMetadata::new();
    let payload = format.format(menu, &tree, &mut cache).await.unwrap();

    let assembler = MenuResourceAssembler::new(resource_types);
    serde_json::to_value(assembler.assemble(menu, payload).unwrap()).unwrap()
}

#[tokio::test]
async fn flat_document_wraps_the_collection_as_an_attribute() {
    let home = link("main", "Home", 0);
    let about = child_of(link("main", "About", 0), &home);
    let main = menu("main", "Main navigation");

    let repo: Arc<dyn MenuRepository> = Arc::new(
        InMemoryMenuRepository::new()
            .with_menu(main.clone())
            .with_link(home.clone())
            .with_link(about),
    );

    let doc = flat_document(repo, &main).await;

    assert_eq!(doc["jsonapi"]["version"], "1.0");
    assert_eq!(doc["data"]["type"], "menu--menu");
    assert_eq!(doc["data"]["id"], main.id.to_string());
    assert_eq!(doc["data"]["attributes"]["name"], "main");
    assert_eq!(doc["data"]["attributes"]["label"], "Main navigation");

    let items = doc["data"]["attributes"]["menu_items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], "menu_link_content--menu_link_content");
    assert_eq!(items[0]["id"], home.id.to_string());
    assert_eq!(items[0]["attributes"]["title"], "Home");

    assert_eq!(doc["included"], json!([]));
    assert_eq!(doc["links"], json!({}));
    assert_eq!(doc["meta"], json!({}));
}

#[tokio::test]
async fn nested_document_embeds_subtrees_inline() {
    let home = link("main", "Home", 0);
    let about = child_of(link("main", "About", 0), &home);
    let main = menu("main", "Main navigation");

    let repo: Arc<dyn MenuRepository> = Arc::new(
        InMemoryMenuRepository::new()
            .with_menu(main.clone())
            .with_link(home)
            .with_link(about),
    );

    let doc = nested_document(repo, &main).await;

    let items = doc["data"]["attributes"]["menu_items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Home");
    assert_eq!(items[0]["below"][0]["title"], "About");
    assert_eq!(items[0]["below"][0]["below"], json!([]));
}

#[tokio::test]
async fn empty_menu_still_yields_a_valid_document() {
    let main = menu("main", "Main navigation");
    let repo: Arc<dyn MenuRepository> =
        Arc::new(InMemoryMenuRepository::new().with_menu(main.clone()));

    let doc = flat_document(repo, &main).await;

    assert_eq!(doc["data"]["type"], "menu--menu");
    assert_eq!(doc["data"]["attributes"]["menu_items"], json!([]));
}
