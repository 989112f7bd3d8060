//! Export coordination
//!
//! [`ExportFormat`] is the fixed registry of output formats, resolved from
//! CLI keys at startup rather than looked up dynamically at request time.
//! The coordinator owns the per-format dispatch: it builds the right
//! attribute spec and geometry extractor for each record family and hands
//! off to the format writers.

use crate::config::CatalogueConfig;
use crate::core::archive::DownloadPayload;
use crate::core::attributes::AttributeSpec;
use crate::core::export::kml::KmlExporter;
use crate::core::export::metadata::MetadataExporter;
use crate::core::export::shapefile::ShapefileExporter;
use crate::core::export::summary::ExportSummary;
use crate::core::geometry::GeometryExtractor;
use crate::domain::catalogue::{GenericProduct, Order, SearchRecord, TaskingRequest, CATALOGUE_SRID};
use crate::domain::errors::CatalogueError;
use crate::domain::record::Record;
use crate::domain::result::Result;
use std::fmt;
use std::str::FromStr;

/// The registered output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Shapefile,
    Kml,
    Kmz,
    IsoMetadata,
    HtmlMetadata,
}

impl ExportFormat {
    /// All registered formats, in listing order
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Shapefile,
            ExportFormat::Kml,
            ExportFormat::Kmz,
            ExportFormat::IsoMetadata,
            ExportFormat::HtmlMetadata,
        ]
    }

    /// The CLI key for this format
    pub fn key(&self) -> &'static str {
        match self {
            ExportFormat::Shapefile => "shp",
            ExportFormat::Kml => "kml",
            ExportFormat::Kmz => "kmz",
            ExportFormat::IsoMetadata => "iso-metadata",
            ExportFormat::HtmlMetadata => "html-metadata",
        }
    }

    /// Human-readable description for format listings
    pub fn describe(&self) -> &'static str {
        match self {
            ExportFormat::Shapefile => "Zipped ESRI shapefile",
            ExportFormat::Kml => "KML document",
            ExportFormat::Kmz => "KMZ archive with thumbnails",
            ExportFormat::IsoMetadata => "Zipped ISO XML metadata with thumbnails",
            ExportFormat::HtmlMetadata => "Zipped HTML metadata with thumbnails",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExportFormat {
    type Err = CatalogueError;

    fn from_str(s: &str) -> Result<Self> {
        ExportFormat::all()
            .iter()
            .find(|format| format.key() == s)
            .copied()
            .ok_or_else(|| {
                CatalogueError::Validation(format!(
                    "Unknown export format '{s}'. Registered formats: {}",
                    ExportFormat::all()
                        .iter()
                        .map(ExportFormat::key)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Per-request export options
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Output file stem, extension added by the format writer
    pub file_stem: String,
    /// Optional reprojection target; shapefile output only
    pub target_epsg: Option<u32>,
    /// Optional `README.txt` content for zipped formats
    pub readme: Option<String>,
}

impl ExportOptions {
    pub fn new(file_stem: impl Into<String>) -> Self {
        Self {
            file_stem: file_stem.into(),
            ..Default::default()
        }
    }
}

/// Dispatches export requests to the format writers
pub struct ExportCoordinator<'a> {
    config: &'a CatalogueConfig,
}

impl<'a> ExportCoordinator<'a> {
    pub fn new(config: &'a CatalogueConfig) -> Self {
        Self { config }
    }

    /// Export a search result set in the requested format
    pub fn export_search_records(
        &self,
        records: &[SearchRecord],
        format: ExportFormat,
        options: &ExportOptions,
    ) -> Result<(DownloadPayload, ExportSummary)> {
        let spec = AttributeSpec::catalogue_products(self.config.export.field_width);
        let flat: Vec<Record> = records.iter().map(|r| r.product.to_record()).collect();
        match format {
            ExportFormat::Shapefile => self.shapefile(&spec, &flat, options),
            ExportFormat::Kml => {
                let exporter = KmlExporter::new(&spec, CATALOGUE_SRID)?;
                exporter.export_kml(&flat, &options.file_stem)
            }
            ExportFormat::Kmz => {
                let exporter = KmlExporter::new(&spec, CATALOGUE_SRID)?;
                exporter.export_kmz(
                    &flat,
                    &options.file_stem,
                    &self.thumbnails_dir(),
                    self.config.export.max_metadata_records,
                )
            }
            ExportFormat::IsoMetadata => {
                let products: Vec<GenericProduct> =
                    records.iter().map(|r| r.product.clone()).collect();
                self.metadata_exporter().export_iso(
                    &products,
                    &options.file_stem,
                    &self.thumbnails_dir(),
                )
            }
            ExportFormat::HtmlMetadata => {
                let products: Vec<GenericProduct> =
                    records.iter().map(|r| r.product.clone()).collect();
                self.metadata_exporter().export_html(
                    &products,
                    &options.file_stem,
                    &self.thumbnails_dir(),
                )
            }
        }
    }

    /// Export tasking request footprints as a zipped shapefile
    pub fn export_tasking_requests(
        &self,
        requests: &[TaskingRequest],
        options: &ExportOptions,
    ) -> Result<(DownloadPayload, ExportSummary)> {
        let spec = AttributeSpec::tasking_requests(self.config.export.field_width);
        let flat: Vec<Record> = requests.iter().map(TaskingRequest::to_record).collect();
        self.shapefile(&spec, &flat, options)
    }

    /// Export order delivery clip geometries as a zipped shapefile
    pub fn export_order_deliveries(
        &self,
        orders: &[Order],
        options: &ExportOptions,
    ) -> Result<(DownloadPayload, ExportSummary)> {
        let spec = AttributeSpec::order_deliveries(self.config.export.field_width);
        let flat: Vec<Record> = orders.iter().map(Order::to_delivery_record).collect();
        self.shapefile(&spec, &flat, options)
    }

    fn shapefile(
        &self,
        spec: &AttributeSpec,
        records: &[Record],
        options: &ExportOptions,
    ) -> Result<(DownloadPayload, ExportSummary)> {
        let extractor = GeometryExtractor::new(CATALOGUE_SRID, options.target_epsg)?;
        let exporter = ShapefileExporter::new(spec, &extractor);
        exporter.export(records, &options.file_stem, options.readme.as_deref())
    }

    fn metadata_exporter(&self) -> MetadataExporter {
        MetadataExporter::new(
            self.config.organisation.acronym.clone(),
            self.config.export.max_metadata_records,
        )
    }

    fn thumbnails_dir(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(&self.config.export.thumbnails_dir)
    }
}
