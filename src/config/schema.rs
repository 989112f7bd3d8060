//! Configuration schema types

use serde::{Deserialize, Serialize};

/// Main catalogue configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Organisation identity used in archive names and email addresses
    pub organisation: OrganisationConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Email notification settings
    pub email: EmailConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CatalogueConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.organisation.validate()?;
        self.export.validate()?;
        self.email.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Organisation identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganisationConfig {
    /// Acronym used in metadata archive names
    #[serde(default = "default_acronym")]
    pub acronym: String,

    /// Domain used for the `dontreply@<domain>` sender address
    pub domain: String,

    /// WMS server host used in map layer definitions
    #[serde(default = "default_wms_server")]
    pub wms_server: String,
}

impl OrganisationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.acronym.is_empty() {
            return Err("organisation.acronym must not be empty".to_string());
        }
        if self.domain.is_empty() || self.domain.contains('@') {
            return Err(format!(
                "organisation.domain '{}' must be a bare domain name",
                self.domain
            ));
        }
        Ok(())
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Cap on records whose metadata/thumbnails are bundled per archive
    #[serde(default = "default_max_metadata_records")]
    pub max_metadata_records: usize,

    /// DBF character field width
    #[serde(default = "default_field_width")]
    pub field_width: u8,

    /// Directory holding georeferenced thumbnails and world files
    #[serde(default = "default_thumbnails_dir")]
    pub thumbnails_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_metadata_records: default_max_metadata_records(),
            field_width: default_field_width(),
            thumbnails_dir: default_thumbnails_dir(),
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_metadata_records == 0 {
            return Err("export.max_metadata_records must be greater than 0".to_string());
        }
        if self.field_width == 0 {
            return Err("export.field_width must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Email notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Master switch; when false, notifications are skipped entirely
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    /// SMTP relay host
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP relay port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Support address always included in the recipient set
    pub support_address: String,

    /// Fallback recipients when no user or subscriber resolves
    #[serde(default)]
    pub default_recipients: Vec<String>,

    /// Header image attached inline to HTML notifications
    #[serde(default = "default_header_image")]
    pub header_image: String,
}

impl EmailConfig {
    fn validate(&self) -> Result<(), String> {
        if self.support_address.is_empty() || !self.support_address.contains('@') {
            return Err(format!(
                "email.support_address '{}' is not a valid address",
                self.support_address
            ));
        }
        for recipient in &self.default_recipients {
            if !recipient.contains('@') {
                return Err(format!(
                    "email.default_recipients entry '{recipient}' is not a valid address"
                ));
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable rolling file logs in addition to console output
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for rolling log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid = ["daily", "hourly"];
        if !valid.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid.join(", ")
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
impl CatalogueConfig {
    /// Minimal valid configuration for unit tests
    pub fn for_tests() -> Self {
        Self {
            application: ApplicationConfig::default(),
            organisation: OrganisationConfig {
                acronym: "SANSA".to_string(),
                domain: "catalogue.example.org".to_string(),
                wms_server: default_wms_server(),
            },
            export: ExportConfig::default(),
            email: EmailConfig {
                notifications_enabled: true,
                smtp_host: "localhost".to_string(),
                smtp_port: 25,
                support_address: "support@example.org".to_string(),
                default_recipients: Vec::new(),
                header_image: default_header_image(),
            },
            logging: LoggingConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_acronym() -> String {
    "SANSA".to_string()
}

fn default_wms_server() -> String {
    "maps.example.org".to_string()
}

fn default_max_metadata_records() -> usize {
    500
}

fn default_field_width() -> u8 {
    255
}

fn default_thumbnails_dir() -> String {
    "thumbnails".to_string()
}

fn default_true() -> bool {
    true
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    25
}

fn default_header_image() -> String {
    "images/header_email.jpg".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> CatalogueConfig {
        CatalogueConfig::for_tests()
    }

    #[test]
    fn test_minimal_config_validates() {
        assert!(minimal_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = minimal_config();
        config.application.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_domain_with_at_sign_rejected() {
        let mut config = minimal_config();
        config.organisation.domain = "dontreply@example.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_record_cap_rejected() {
        let mut config = minimal_config();
        config.export.max_metadata_records = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_support_address_rejected() {
        let mut config = minimal_config();
        config.email.support_address = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_defaults() {
        let export = ExportConfig::default();
        assert_eq!(export.max_metadata_records, 500);
        assert_eq!(export.field_width, 255);
    }
}
