//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the catalogue
//! export tool using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// eocat - Earth observation catalogue export tool
#[derive(Parser, Debug)]
#[command(name = "eocat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "eocat.toml", env = "EOCAT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "EOCAT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export catalogue records to a download archive
    Export(commands::export::ExportArgs),

    /// Send an order status notification
    Notify(commands::notify::NotifyArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
