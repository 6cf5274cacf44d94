//! Atomic media components: images, embeds and GIFs.
//!
//! Media components have length 1 and own an inline caption paragraph that
//! lives in the arena under [`ComponentId::caption`](crate::ComponentId::caption).

use serde::{Deserialize, Serialize};

/// Pixel dimensions of embedded media.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSize {
    pub width: u32,
    pub height: u32,
}

/// An image.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Figure {
    #[serde(default)]
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Figure {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }
}

/// Kind of third-party embed, as reported by the provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedType {
    Video,
    #[default]
    Rich,
    Photo,
    Link,
}

/// Third-party content resolved through an embedding provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedComponent {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default, rename = "type")]
    pub embed_type: EmbedType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<MediaSize>,
}

impl EmbeddedComponent {
    pub fn new(url: impl Into<String>, provider: impl Into<String>, embed_type: EmbedType) -> Self {
        Self {
            url: url.into(),
            provider: provider.into(),
            embed_type,
            sizes: None,
        }
    }
}

/// An animated GIF picked from a GIF search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiphyComponent {
    #[serde(default)]
    pub src: String,
}
