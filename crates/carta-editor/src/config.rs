//! Editor configuration, loadable from TOML.
//!
//! ```toml
//! history_limit = 500
//! input_debounce_ms = 150
//! placeholder_text = "Tell your story..."
//! mac_keybindings = true
//! ```

use std::path::Path;
use std::time::Duration;

use carta_core::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Maximum number of retained history batches. 0 keeps everything.
    pub history_limit: usize,
    /// Coalescing window for native text input.
    pub input_debounce_ms: u64,
    /// Word budget of article snippets.
    pub snippet_words: usize,
    /// Shown by empty placeholder paragraphs.
    pub placeholder_text: Option<String>,
    /// Run the autoformat patterns after flushed input.
    pub autoformat: bool,
    /// Use Cmd instead of Ctrl as the primary modifier.
    pub mac_keybindings: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            input_debounce_ms: 300,
            snippet_words: 30,
            placeholder_text: Some("Start writing...".to_string()),
            autoformat: true,
            mac_keybindings: false,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(s: &str) -> miette::Result<Self> {
        let config = toml::from_str(s).map_err(Error::from)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> miette::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn input_debounce(&self) -> Duration {
        Duration::from_millis(self.input_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.history_limit, 200);
        assert_eq!(config.input_debounce(), Duration::from_millis(300));
        assert_eq!(config.snippet_words, 30);
        assert_eq!(config.placeholder_text.as_deref(), Some("Start writing..."));
        assert!(config.autoformat);
        assert!(!config.mac_keybindings);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EditorConfig::from_toml_str("history_limit = 0\nmac_keybindings = true\n").unwrap();
        assert_eq!(config.history_limit, 0);
        assert!(config.mac_keybindings);
        assert_eq!(config.snippet_words, 30);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(EditorConfig::from_toml_str("colour = \"red\"").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = EditorConfig::load("/nonexistent/carta.toml").unwrap_err();
        assert!(err.to_string().contains("carta.toml"));
    }
}
