//! Class registry.
//!
//! Operations and document JSON refer to variants by class name. The
//! `Loader` resolves those names to factories; it is the only place where a
//! string turns into a concrete component type.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::components::{self, Attrs, ComponentKind, class};
use crate::error::{EditorError, Result};

/// Builds a component variant from its attributes.
pub type ComponentFactory = fn(&Attrs) -> Result<ComponentKind>;

/// Name → factory table, passed explicitly to whatever executes operations.
#[derive(Clone, Debug)]
pub struct Loader {
    classes: HashMap<SmolStr, ComponentFactory>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl Loader {
    /// A registry with no classes.
    pub fn empty() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    /// A registry with every built-in variant registered.
    pub fn with_builtin() -> Self {
        let mut loader = Self::empty();
        let builtin: [(&str, ComponentFactory); 7] = [
            (class::PARAGRAPH, components::paragraph_factory),
            (class::FIGURE, components::figure_factory),
            (class::LIST, components::list_factory),
            (class::LAYOUT, components::layout_factory),
            (class::SECTION, components::section_factory),
            (class::EMBEDDED_COMPONENT, components::embedded_factory),
            (class::GIPHY_COMPONENT, components::giphy_factory),
        ];
        for (name, factory) in builtin {
            loader.classes.insert(SmolStr::new_static(name), factory);
        }
        loader
    }

    /// Register `factory` under `name`. Re-registering requires `force`.
    pub fn register(&mut self, name: &str, factory: ComponentFactory, force: bool) -> Result<()> {
        if !force && self.classes.contains_key(name) {
            return Err(EditorError::AlreadyRegistered {
                kind: "component class",
                name: name.to_string(),
            });
        }
        self.classes.insert(SmolStr::new(name), factory);
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn load(&self, name: &str) -> Result<ComponentFactory> {
        self.classes
            .get(name)
            .copied()
            .ok_or_else(|| EditorError::UnknownClass(SmolStr::new(name)))
    }

    /// Resolve `name` and build a variant from `attrs`.
    pub fn build(&self, name: &str, attrs: &Attrs) -> Result<ComponentKind> {
        (self.load(name)?)(attrs)
    }
}
