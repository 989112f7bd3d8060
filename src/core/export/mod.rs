//! Export orchestration and format writers

pub mod coordinator;
pub mod kml;
pub mod metadata;
pub mod shapefile;
pub mod summary;

pub use coordinator::{ExportCoordinator, ExportFormat, ExportOptions};
pub use kml::KmlExporter;
pub use metadata::MetadataExporter;
pub use shapefile::ShapefileExporter;
pub use summary::ExportSummary;
