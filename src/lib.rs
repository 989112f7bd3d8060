// eocat - Earth observation catalogue export tool
// Copyright (c) 2025 eocat Contributors
// Licensed under the MIT License

//! # eocat - Earth observation catalogue exports
//!
//! eocat packages satellite imagery catalogue records into downloadable
//! archives and sends order status notifications for a national EO
//! catalogue.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Projecting** catalogue records into DBF-safe attribute columns
//! - **Extracting** WKT footprints with optional reprojection
//! - **Writing** shapefile, KML/KMZ, and ISO/HTML metadata archives
//! - **Notifying** users and sales staff of order status changes by email
//!
//! ## Architecture
//!
//! eocat follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (attributes, geometry, export, archive)
//! - [`notify`] - Order status notification composition and delivery
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eocat::config::load_config;
//! use eocat::core::export::{ExportCoordinator, ExportFormat, ExportOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("eocat.toml")?;
//!     let coordinator = ExportCoordinator::new(&config);
//!
//!     let records = Vec::new(); // search records from the catalogue
//!     let (payload, summary) = coordinator.export_search_records(
//!         &records,
//!         ExportFormat::Shapefile,
//!         &ExportOptions::new("records"),
//!     )?;
//!
//!     std::fs::write(&payload.file_name, &payload.body)?;
//!     println!("{}", summary.report());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! eocat uses the [`domain::CatalogueError`] type for all errors:
//!
//! ```rust,no_run
//! use eocat::domain::CatalogueError;
//!
//! fn example() -> Result<(), CatalogueError> {
//!     let config = eocat::config::load_config("eocat.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! eocat uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export");
//! warn!(product_id = "S5-0001", "Thumbnail not packaged");
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod notify;
