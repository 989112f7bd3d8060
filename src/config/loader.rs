//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::CatalogueConfig;
use crate::domain::errors::CatalogueError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`CatalogueConfig`]
/// 4. Applies environment variable overrides (`EOCAT_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing fails, a referenced
/// environment variable is unset, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<CatalogueConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CatalogueError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CatalogueError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CatalogueConfig = toml::from_str(&contents)
        .map_err(|e| CatalogueError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        CatalogueError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are skipped. Returns an error naming every unset variable.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CatalogueError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `EOCAT_*` prefix
///
/// Variables follow the pattern `EOCAT_<SECTION>_<KEY>`, for example
/// `EOCAT_ORGANISATION_ACRONYM` or `EOCAT_EMAIL_SMTP_HOST`.
fn apply_env_overrides(config: &mut CatalogueConfig) {
    if let Ok(val) = std::env::var("EOCAT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("EOCAT_ORGANISATION_ACRONYM") {
        config.organisation.acronym = val;
    }
    if let Ok(val) = std::env::var("EOCAT_ORGANISATION_DOMAIN") {
        config.organisation.domain = val;
    }
    if let Ok(val) = std::env::var("EOCAT_ORGANISATION_WMS_SERVER") {
        config.organisation.wms_server = val;
    }

    if let Ok(val) = std::env::var("EOCAT_EXPORT_MAX_METADATA_RECORDS") {
        if let Ok(cap) = val.parse() {
            config.export.max_metadata_records = cap;
        }
    }
    if let Ok(val) = std::env::var("EOCAT_EXPORT_FIELD_WIDTH") {
        if let Ok(width) = val.parse() {
            config.export.field_width = width;
        }
    }
    if let Ok(val) = std::env::var("EOCAT_EXPORT_THUMBNAILS_DIR") {
        config.export.thumbnails_dir = val;
    }

    if let Ok(val) = std::env::var("EOCAT_EMAIL_NOTIFICATIONS_ENABLED") {
        config.email.notifications_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("EOCAT_EMAIL_SMTP_HOST") {
        config.email.smtp_host = val;
    }
    if let Ok(val) = std::env::var("EOCAT_EMAIL_SMTP_PORT") {
        if let Ok(port) = val.parse() {
            config.email.smtp_port = port;
        }
    }
    if let Ok(val) = std::env::var("EOCAT_EMAIL_SUPPORT_ADDRESS") {
        config.email.support_address = val;
    }

    if let Ok(val) = std::env::var("EOCAT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("EOCAT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
