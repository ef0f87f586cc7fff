//! Plugin id decoding for menu links.
//!
//! A link's opaque id is "provider:reference". When the provider is
//! [`ENTITY_PROVIDER`], the reference is the UUID of the backing entity.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use crate::models::menu_link::ENTITY_PROVIDER;

/// Failures decoding a link plugin id.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PluginIdError {
    /// Id is missing the "provider:reference" separator or a half is empty.
    #[error("menu link id '{0}' is not of the form provider:reference")]
    Malformed(String),

    /// Entity-backed id whose reference is not a UUID.
    #[error("menu link id '{id}' carries a malformed entity reference '{reference}'")]
    InvalidReference { id: String, reference: String },
}

/// Decoded menu link plugin id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPluginId {
    /// Source that provides the link.
    pub provider: String,

    /// Provider-scoped reference (a UUID for entity-backed links).
    pub reference: String,
}

impl LinkPluginId {
    /// UUID of the backing entity, or `None` for links the provider defines
    /// statically.
    pub fn entity_uuid(&self) -> Result<Option<Uuid>, PluginIdError> {
        if self.provider != ENTITY_PROVIDER {
            return Ok(None);
        }
        Uuid::parse_str(&self.reference)
            .map(Some)
            .map_err(|_| PluginIdError::InvalidReference {
                id: self.to_string(),
                reference: self.reference.clone(),
            })
    }
}

impl FromStr for LinkPluginId {
    type Err = PluginIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, reference) = s
            .split_once(':')
            .ok_or_else(|| PluginIdError::Malformed(s.to_string()))?;

        if provider.is_empty() || reference.is_empty() {
            return Err(PluginIdError::Malformed(s.to_string()));
        }

        Ok(Self {
            provider: provider.to_string(),
            reference: reference.to_string(),
        })
    }
}

impl fmt::Display for LinkPluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.reference)
    }
}
