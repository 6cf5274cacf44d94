//! Document JSON.
//!
//! `{"name": ..., "sections": [{"component": "Section", "name": ...,
//! "components": [...]}]}`. Every component is written as its class name,
//! its name, its own attributes flattened next to them and, for containers,
//! its children under `components`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::article::Article;
use crate::components::{Attrs, caption_from_attrs};
use crate::error::Result;
use crate::id::ComponentId;
use crate::loader::Loader;
use crate::ops::NewComponent;

/// Serialized article.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<ComponentId>,
    #[serde(default)]
    pub sections: Vec<ComponentJson>,
}

/// Serialized component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentJson {
    pub component: SmolStr,
    #[serde(default = "ComponentId::generate")]
    pub name: ComponentId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentJson>,
    #[serde(flatten)]
    pub attrs: Attrs,
}

impl NewComponent {
    /// Resolve a serialized component through the class registry.
    pub fn from_json(json: &ComponentJson, loader: &Loader) -> Result<Self> {
        let kind = loader.build(&json.component, &json.attrs)?;
        let caption = kind
            .has_caption()
            .then(|| caption_from_attrs(&json.attrs));
        let children = json
            .components
            .iter()
            .map(|child| Self::from_json(child, loader))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: json.name.clone(),
            kind,
            caption,
            children,
        })
    }

    pub fn to_json(&self) -> Result<ComponentJson> {
        Ok(ComponentJson {
            component: SmolStr::new_static(self.class_name()),
            name: self.name.clone(),
            components: self
                .children
                .iter()
                .map(NewComponent::to_json)
                .collect::<Result<Vec<_>>>()?,
            attrs: self.attrs()?,
        })
    }
}

impl Article {
    pub fn to_json(&self) -> Result<DocumentJson> {
        let sections = self
            .tree
            .sections()
            .iter()
            .map(|id| NewComponent::snapshot(&self.tree, id)?.to_json())
            .collect::<Result<Vec<_>>>()?;
        Ok(DocumentJson {
            name: Some(self.name().clone()),
            sections,
        })
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json()?)?)
    }

    /// Rebuild an article. Unknown classes fail with `UnknownClass`.
    pub fn from_json(json: &DocumentJson, loader: Arc<Loader>) -> Result<Self> {
        let sections = json
            .sections
            .iter()
            .map(|section| NewComponent::from_json(section, &loader))
            .collect::<Result<Vec<_>>>()?;
        let name = json.name.clone().unwrap_or_else(ComponentId::generate);
        Article::from_components(loader, name, sections)
    }

    pub fn from_json_str(s: &str, loader: Arc<Loader>) -> Result<Self> {
        let json: DocumentJson = serde_json::from_str(s)?;
        Self::from_json(&json, loader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;

    const DOC: &str = r#"{
        "name": "doc",
        "sections": [{
            "component": "Section",
            "name": "s1",
            "components": [
                {"component": "Paragraph", "name": "h", "text": "Title",
                 "paragraphType": "h1", "formats": []},
                {"component": "Layout", "name": "l", "type": "layout-bleed",
                 "components": [
                    {"component": "Figure", "name": "f", "src": "cover.jpg",
                     "width": 800, "caption": "A cover", "captionFormats": []}
                 ]},
                {"component": "List", "name": "list", "tagName": "ol",
                 "components": [
                    {"component": "Paragraph", "name": "li", "text": "first",
                     "paragraphType": "li",
                     "formats": [{"type": "strong", "from": 0, "to": 5}]}
                 ]},
                {"component": "EmbeddedComponent", "name": "e",
                 "url": "https://video.example/1", "provider": "example",
                 "type": "video", "sizes": {"width": 640, "height": 360},
                 "caption": "", "captionFormats": []},
                {"component": "GiphyComponent", "name": "g", "src": "cat.gif",
                 "caption": "", "captionFormats": []}
            ]
        }]
    }"#;

    #[test]
    fn test_round_trip_is_lossless() {
        let loader = Arc::new(Loader::default());
        let article = Article::from_json_str(DOC, loader.clone()).unwrap();
        assert!(article.has_cover());
        assert_eq!(article.title().as_deref(), Some("Title"));
        let caption = article.paragraph(&ComponentId::new("f").caption()).unwrap();
        assert_eq!(caption.text_string(), "A cover");

        let expected: DocumentJson = serde_json::from_str(DOC).unwrap();
        assert_eq!(article.to_json().unwrap(), expected);

        let again = Article::from_json(&article.to_json().unwrap(), loader).unwrap();
        assert_eq!(again.tree(), article.tree());
    }

    #[test]
    fn test_unknown_class_fails() {
        let doc = r#"{"sections": [{"component": "Carousel", "name": "c"}]}"#;
        let err = Article::from_json_str(doc, Arc::new(Loader::default())).unwrap_err();
        assert!(matches!(err, EditorError::UnknownClass(name) if name == "Carousel"));
    }
}
