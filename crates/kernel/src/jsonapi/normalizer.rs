//! Field value normalization seam.

use serde_json::Value;

use super::ResourceType;

/// Produces the serializable form of one entity field value.
///
/// The resource type gives normalizers the exposure context of the field's
/// owner, matching what the host API layer passes to its serializers.
pub trait FieldNormalizer: Send + Sync {
    /// Normalize a field value for output.
    fn normalize(&self, resource_type: &ResourceType, field_name: &str, value: &Value) -> Value;
}

/// Default normalizer.
///
/// Single-value fields are stored as one-element arrays; those unwrap to the
/// bare value. Everything else passes through untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNormalizer;

impl FieldNormalizer for DefaultNormalizer {
    fn normalize(&self, _resource_type: &ResourceType, _field_name: &str, value: &Value) -> Value {
        match value {
            Value::Array(items) if items.len() == 1 => items[0].clone(),
            other => other.clone(),
        }
    }
}
