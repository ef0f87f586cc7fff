//! Minimal JSON:API resource primitives consumed by the menu formats.
//!
//! Generic document assembly (includes, sparse fieldsets, pagination) stays
//! with the host API layer; only the shapes the menu resource emits live
//! here.

mod document;
mod normalizer;
mod resource_type;

pub use document::{JsonApiDocument, MEDIA_TYPE, ResourceObject};
pub use normalizer::{DefaultNormalizer, FieldNormalizer};
pub use resource_type::{ResourceType, ResourceTypeRepository};
