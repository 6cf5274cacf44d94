//! Error types for editor actions and setup.

use std::path::PathBuf;

use carta_core::EditorError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum Error {
    /// Document model failure while building or applying ops.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Core(#[from] EditorError),

    /// An autoformat pattern that does not compile.
    #[error("invalid autoformat pattern `{pattern}`")]
    #[diagnostic(code(carta::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read config file {}", path.display())]
    #[diagnostic(code(carta::config_io))]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid editor config")]
    #[diagnostic(code(carta::config_parse), help("see EditorConfig for the accepted keys"))]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
