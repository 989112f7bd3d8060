//! Export command implementation
//!
//! Reads a record set from a JSON document and writes the requested
//! download archive to disk. The input document declares which record
//! family it carries; tasking requests and order deliveries only support
//! the shapefile format.

use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportFormat, ExportOptions};
use crate::domain::catalogue::{Order, SearchRecord, TaskingRequest};
use clap::Args;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

/// Record set read from the input document
#[derive(Deserialize, Debug)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ExportInput {
    SearchRecords { records: Vec<SearchRecord> },
    TaskingRequests { requests: Vec<TaskingRequest> },
    OrderDeliveries { orders: Vec<Order> },
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// JSON document holding the record set to export
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format key (see validate-config for the registry)
    #[arg(short, long, default_value = "shp")]
    pub format: String,

    /// Directory the archive is written into
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// File stem for the archive; defaults to the input file stem
    #[arg(long)]
    pub name: Option<String>,

    /// Reproject shapefile output to this EPSG code
    #[arg(long)]
    pub target_epsg: Option<u32>,

    /// Text for a README.txt entry in zipped output
    #[arg(long)]
    pub readme: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), format = %self.format, "Starting export");

        let config = load_config(config_path)?;
        let format = match ExportFormat::from_str(&self.format) {
            Ok(format) => format,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let raw = std::fs::read_to_string(&self.input)?;
        let input: ExportInput = serde_json::from_str(&raw)?;

        let options = ExportOptions {
            file_stem: self.file_stem(),
            target_epsg: self.target_epsg,
            readme: self.readme.clone(),
        };

        let coordinator = ExportCoordinator::new(&config);
        let (payload, summary) = match &input {
            ExportInput::SearchRecords { records } => {
                coordinator.export_search_records(records, format, &options)?
            }
            ExportInput::TaskingRequests { requests } => {
                if format != ExportFormat::Shapefile {
                    eprintln!("❌ Tasking requests only export as shapefile (shp)");
                    return Ok(2);
                }
                coordinator.export_tasking_requests(requests, &options)?
            }
            ExportInput::OrderDeliveries { orders } => {
                if format != ExportFormat::Shapefile {
                    eprintln!("❌ Order deliveries only export as shapefile (shp)");
                    return Ok(2);
                }
                coordinator.export_order_deliveries(orders, &options)?
            }
        };

        std::fs::create_dir_all(&self.output)?;
        let target = self.output.join(&payload.file_name);
        std::fs::write(&target, &payload.body)?;

        println!("✅ Export complete: {}", target.display());
        println!("   {}", summary.report());
        for (name, value) in payload.headers() {
            println!("   {name}: {value}");
        }
        Ok(0)
    }

    fn file_stem(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .input
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("records")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_defaults_to_input_stem() {
        let args = ExportArgs {
            input: PathBuf::from("/tmp/search-77.json"),
            format: "shp".to_string(),
            output: PathBuf::from("."),
            name: None,
            target_epsg: None,
            readme: None,
        };
        assert_eq!(args.file_stem(), "search-77");
    }

    #[test]
    fn test_file_stem_override() {
        let args = ExportArgs {
            input: PathBuf::from("/tmp/search-77.json"),
            format: "shp".to_string(),
            output: PathBuf::from("."),
            name: Some("records".to_string()),
            target_epsg: None,
            readme: None,
        };
        assert_eq!(args.file_stem(), "records");
    }

    #[test]
    fn test_input_document_parses_search_records() {
        let raw = r#"{
            "kind": "tasking-requests",
            "requests": [
                {
                    "id": 9,
                    "satellite_instrument_group": "ZASat-2 MSS",
                    "target_date": "2024-06-01",
                    "geometry": null
                }
            ]
        }"#;
        let input: ExportInput = serde_json::from_str(raw).unwrap();
        assert!(matches!(input, ExportInput::TaskingRequests { .. }));
    }
}
