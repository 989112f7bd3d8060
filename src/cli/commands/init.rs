//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "eocat.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing eocat configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set organisation.domain to your catalogue host");
                println!("  3. Point export.thumbnails_dir at the thumbnail store");
                println!("  4. Validate configuration: eocat validate-config");
                println!("  5. Run an export: eocat export --input records.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# eocat Configuration File
# Earth observation catalogue export tool

[application]
log_level = "info"

[organisation]
acronym = "SANSA"
domain = "catalogue.sansa.org.za"
wms_server = "maps.sansa.org.za"

[export]
max_metadata_records = 500
field_width = 255
thumbnails_dir = "/var/catalogue/thumbnails"

[email]
notifications_enabled = true
smtp_host = "localhost"
smtp_port = 25
support_address = "${EOCAT_SUPPORT_ADDRESS}"
default_recipients = []
header_image = "images/header_email.jpg"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# eocat Configuration File
# Earth observation catalogue export tool
#
# This file contains all configuration options with examples and explanations.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Organisation Identity
# ============================================================================
[organisation]
# Acronym used in metadata archive names, e.g. SANSA-search77-Metadata.zip
acronym = "SANSA"

# Bare domain for the dontreply@<domain> sender address
domain = "catalogue.sansa.org.za"

# WMS host used when rendering map layer URLs
wms_server = "maps.sansa.org.za"

# ============================================================================
# Export Settings
# ============================================================================
[export]
# Cap on records whose metadata documents are bundled per archive
max_metadata_records = 500

# Character width of DBF attribute columns (1-255)
field_width = 255

# Directory holding georeferenced thumbnails ({product_id}.jpg + .wld)
thumbnails_dir = "/var/catalogue/thumbnails"

# ============================================================================
# Email Notifications
# ============================================================================
[email]
# Master switch; when false, notification runs are skipped entirely
notifications_enabled = true

# SMTP relay
smtp_host = "localhost"
smtp_port = 25

# Always included in the recipient set (use environment variable)
support_address = "${EOCAT_SUPPORT_ADDRESS}"

# Fallback recipients used only when no user or subscriber resolves
default_recipients = ["sales@catalogue.sansa.org.za"]

# Image attached inline to the HTML body
header_image = "images/header_email.jpg"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable rolling file logs in addition to console output
local_enabled = false

# Directory for rolling log files
local_path = "logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
