//! Domain error types
//!
//! The error hierarchy follows the catalogue's error taxonomy: configuration
//! problems are fatal before any I/O, resource and geometry failures abort the
//! whole export, while per-field and per-thumbnail problems are recovered
//! locally by the callers and never surface here.

use thiserror::Error;

/// Main catalogue error type
///
/// This is the primary error type used throughout the crate. Variants map to
/// the failure classes of the export and notification pipelines.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Configuration errors: missing settings, unresolvable spatial
    /// reference codes, attribute specs with colliding truncated names.
    /// Raised before any output is written.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Output datasource or layer could not be created
    #[error("Resource error: {0}")]
    Resource(String),

    /// Invalid WKT or a failed coordinate transform. Fatal for the whole
    /// export; a partially written archive is never returned.
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Archive assembly failures, including missing shapefile companions
    #[error("Packaging error: {0}")]
    Packaging(String),

    /// Email rendering or dispatch failures
    #[error("Notification error: {0}")]
    Notification(String),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Template rendering errors
    #[error("Template error: {0}")]
    Template(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CatalogueError {
    fn from(err: std::io::Error) -> Self {
        CatalogueError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogueError {
    fn from(err: serde_json::Error) -> Self {
        CatalogueError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CatalogueError {
    fn from(err: toml::de::Error) -> Self {
        CatalogueError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<askama::Error> for CatalogueError {
    fn from(err: askama::Error) -> Self {
        CatalogueError::Template(err.to_string())
    }
}

impl From<zip::result::ZipError> for CatalogueError {
    fn from(err: zip::result::ZipError) -> Self {
        CatalogueError::Packaging(err.to_string())
    }
}
