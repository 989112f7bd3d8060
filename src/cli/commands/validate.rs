//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the catalogue configuration file.

use crate::config::load_config;
use crate::core::export::ExportFormat;
use crate::core::geometry::srs;
use crate::core::layers;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration file loaded successfully");
                config
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Organisation: {}", config.organisation.acronym);
                println!("  Sender Domain: {}", config.organisation.domain);
                println!("  WMS Server: {}", config.organisation.wms_server);
                println!("  Metadata Record Cap: {}", config.export.max_metadata_records);
                println!("  DBF Field Width: {}", config.export.field_width);
                println!("  Thumbnails Directory: {}", config.export.thumbnails_dir);
                println!(
                    "  Notifications: {}",
                    if config.email.notifications_enabled {
                        "enabled"
                    } else {
                        "disabled"
                    }
                );
                println!(
                    "  SMTP Relay: {}:{}",
                    config.email.smtp_host, config.email.smtp_port
                );
                println!("  Support Address: {}", config.email.support_address);
                println!();
                println!("Export Formats:");
                for format in ExportFormat::all() {
                    println!("  {:<14} {}", format.key(), format.describe());
                }
                println!();
                println!("Spatial References: {:?}", srs::registered_codes());
                println!(
                    "Map Layers: {:?}",
                    layers::registered_layers()
                        .iter()
                        .map(|layer| layer.key)
                        .collect::<Vec<_>>()
                );
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_creation() {
        let args = ValidateArgs {};
        let _ = format!("{args:?}");
    }

    #[test]
    fn test_missing_config_is_configuration_error() {
        let args = ValidateArgs {};
        let code = args.execute("/nonexistent/eocat.toml").unwrap();
        assert_eq!(code, 2);
    }
}
