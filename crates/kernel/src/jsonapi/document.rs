//! Top-level document and resource object shapes.

use serde::Serialize;
use serde_json::{Map, Value};

/// JSON:API media type.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// A serializable resource object: type name, unique id, attribute mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceObject {
    /// Resource type name (e.g. "menu_link_content--main").
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Unique identifier within the type.
    pub id: String,

    /// Attribute mapping.
    pub attributes: Map<String, Value>,

    /// Resource-level meta, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl ResourceObject {
    /// Create a resource object with empty attributes.
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            attributes: Map::new(),
            meta: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct JsonApiVersion {
    version: &'static str,
}

/// Top-level document with a single primary resource.
///
/// The menu endpoint never produces secondary resources: `included` is
/// always empty, `links` and `meta` are always empty objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonApiDocument {
    jsonapi: JsonApiVersion,

    /// Primary resource.
    pub data: ResourceObject,

    /// Included resources (always empty here).
    pub included: Vec<ResourceObject>,

    /// Document links (always empty here).
    pub links: Map<String, Value>,

    /// Document meta (always empty here).
    pub meta: Map<String, Value>,
}

impl JsonApiDocument {
    /// Build a single-resource document.
    pub fn single(data: ResourceObject) -> Self {
        Self {
            jsonapi: JsonApiVersion { version: "1.0" },
            data,
            included: Vec::new(),
            links: Map::new(),
            meta: Map::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn document_serializes_jsonapi_version() {
        let doc = JsonApiDocument::single(ResourceObject::new("menu--menu", "abc"));
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["jsonapi"]["version"], "1.0");
        assert_eq!(value["data"]["type"], "menu--menu");
        assert_eq!(value["included"], serde_json::json!([]));
        assert_eq!(value["links"], serde_json::json!({}));
        assert_eq!(value["meta"], serde_json::json!({}));
    }

    #[test]
    fn resource_meta_is_omitted_when_absent() {
        let resource = ResourceObject::new("menu--menu", "abc");
        let value = serde_json::to_value(&resource).unwrap();
        assert!(value.get("meta").is_none());
    }
}
