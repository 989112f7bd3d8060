//! Result type alias for the catalogue crate

use super::errors::CatalogueError;

/// Result type alias for catalogue operations
///
/// # Examples
///
/// ```
/// use eocat::domain::result::Result;
/// use eocat::domain::errors::CatalogueError;
///
/// fn resolve_acronym(value: &str) -> Result<String> {
///     if value.is_empty() {
///         return Err(CatalogueError::Configuration("empty acronym".to_string()));
///     }
///     Ok(value.to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CatalogueError>;
