//! Configuration management.
//!
//! TOML-based configuration loading, parsing, and validation with support
//! for environment variable substitution (`${VAR_NAME}`), `EOCAT_*` env
//! overrides, defaults for optional settings, and per-section validation.
//!
//! ```rust,no_run
//! use eocat::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("eocat.toml")?;
//! println!("Acronym: {}", config.organisation.acronym);
//! println!("Record cap: {}", config.export.max_metadata_records);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, CatalogueConfig, EmailConfig, ExportConfig, LoggingConfig,
    OrganisationConfig,
};
