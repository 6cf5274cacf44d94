//! Component identity.
//!
//! Components are addressed by name everywhere: operations, selection points
//! and the arena all carry a [`ComponentId`] instead of a reference, so a
//! history entry can target a component that was deleted and re-created.

use std::fmt;

use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};

/// Length of generated names.
const GENERATED_LEN: usize = 8;

/// Globally unique component name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(SmolStr);

impl ComponentId {
    /// Wrap an existing name.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    /// Generate a fresh random name.
    pub fn generate() -> Self {
        let name: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(GENERATED_LEN)
            .map(char::from)
            .collect();
        Self(SmolStr::new(name))
    }

    /// Name of the inline caption paragraph owned by this component.
    pub fn caption(&self) -> Self {
        Self(format_smolstr!("{}-caption", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names_are_distinct() {
        let a = ComponentId::generate();
        let b = ComponentId::generate();
        assert_eq!(a.as_str().len(), GENERATED_LEN);
        assert_ne!(a, b);
    }

    #[test]
    fn test_caption_name() {
        assert_eq!(ComponentId::new("fig").caption().as_str(), "fig-caption");
    }
}
