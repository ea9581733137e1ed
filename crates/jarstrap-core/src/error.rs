//! Unified error types for the jarstrap toolkit.

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur during jarstrap operations.
#[derive(Error, Debug)]
pub enum JarstrapError {
    // --- Inputs ---

    /// The launcher source template could not be read.
    #[error("template not found at {path}")]
    TemplateNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The Java archive to embed could not be opened.
    #[error("archive not found at {path}")]
    ArchiveNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // --- Configuration ---

    /// The parameter file (`jarstrap.params.json`) was not found.
    #[error("parameter file not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The parameter file exists but contains invalid JSON.
    #[error("failed to parse parameter file at {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The parameter file could not be written.
    #[error("failed to write parameter file at {path}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A launcher parameter failed validation.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    // --- Prerequisites ---

    /// A required external tool (`cmake`, `make`) is not installed.
    #[error("required tool '{name}' not found (install: {install})")]
    MissingTool { name: String, install: String },

    // --- Build ---

    /// Build file generation or compilation failed.
    #[error("build failed: {0}")]
    Build(String),

    // --- Templates ---

    /// Handlebars template rendering failed (invalid template or missing variables).
    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    /// Attempted to scaffold into a directory that already holds a launcher.
    #[error("launcher source already exists: {0}")]
    ProjectExists(PathBuf),

    // --- General ---

    /// A filesystem I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A catch-all for errors from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias for `Result<T, JarstrapError>`.
pub type Result<T> = std::result::Result<T, JarstrapError>;
