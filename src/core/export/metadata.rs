//! Metadata document export
//!
//! Packages one ISO-style XML or HTML metadata document per product into a
//! zip named `{acronym}-{name}-Metadata.zip`, together with the product's
//! thumbnail pair when present on disk. Large selections are capped at a
//! configured record count; the cap is reported in the summary rather than
//! raised as an error.

use crate::core::archive::{content_types, write_thumb_pair, DownloadPayload, ZipBundle};
use crate::core::export::summary::ExportSummary;
use crate::domain::catalogue::GenericProduct;
use crate::domain::errors::CatalogueError;
use crate::domain::result::Result;
use askama::Template;
use std::path::Path;
use std::time::Instant;

/// Flattened product fields for the metadata templates
struct MetadataView {
    product_id: String,
    satellite: String,
    instrument_type: String,
    product_profile: String,
    processing_level: String,
    owner: String,
    license: String,
    acquisition_start: String,
    acquisition_end: String,
    projection: String,
    quality: String,
    spatial_resolution: String,
    creating_software: String,
    orbit_number: String,
    spatial_coverage: String,
}

impl MetadataView {
    fn from_product(product: &GenericProduct) -> Self {
        Self {
            product_id: product.product_id.clone(),
            satellite: product.satellite.clone(),
            instrument_type: product.instrument_type.clone(),
            product_profile: product.product_profile.clone(),
            processing_level: product.processing_level.clone(),
            owner: product.owner.clone(),
            license: product.license.clone(),
            acquisition_start: product.product_acquisition_start.to_rfc3339(),
            acquisition_end: product
                .product_acquisition_end
                .map(|end| end.to_rfc3339())
                .unwrap_or_default(),
            projection: product.projection.clone(),
            quality: product.quality.clone(),
            spatial_resolution: match (product.spatial_resolution_x, product.spatial_resolution_y)
            {
                (Some(x), Some(y)) => format!("{x} x {y} m"),
                (Some(x), None) => format!("{x} m"),
                _ => String::new(),
            },
            creating_software: product.creating_software.clone(),
            orbit_number: product
                .orbit_number
                .map(|orbit| orbit.to_string())
                .unwrap_or_default(),
            spatial_coverage: product.spatial_coverage.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "product-metadata.xml")]
struct IsoDocument {
    view: MetadataView,
}

#[derive(Template)]
#[template(path = "product-metadata.html")]
struct HtmlDocument {
    view: MetadataView,
}

/// Packages per-product metadata documents into download archives
pub struct MetadataExporter {
    acronym: String,
    max_records: usize,
}

impl MetadataExporter {
    pub fn new(acronym: impl Into<String>, max_records: usize) -> Self {
        Self {
            acronym: acronym.into(),
            max_records,
        }
    }

    /// Export ISO XML metadata, one `{product_id}.xml` entry per product
    /// plus its thumbnail pair when present on disk
    pub fn export_iso(
        &self,
        products: &[GenericProduct],
        name: &str,
        thumbnails_dir: &Path,
    ) -> Result<(DownloadPayload, ExportSummary)> {
        self.export(products, name, thumbnails_dir, false)
    }

    /// Export HTML metadata, one `{product_id}.html` entry per product
    /// plus its thumbnail pair when present on disk
    pub fn export_html(
        &self,
        products: &[GenericProduct],
        name: &str,
        thumbnails_dir: &Path,
    ) -> Result<(DownloadPayload, ExportSummary)> {
        self.export(products, name, thumbnails_dir, true)
    }

    fn export(
        &self,
        products: &[GenericProduct],
        name: &str,
        thumbnails_dir: &Path,
        html: bool,
    ) -> Result<(DownloadPayload, ExportSummary)> {
        let started = Instant::now();
        let mut summary = ExportSummary::new();
        let mut bundle = ZipBundle::new();

        if products.len() > self.max_records {
            summary.records_capped = products.len() - self.max_records;
            tracing::warn!(
                total = products.len(),
                cap = self.max_records,
                "Metadata selection capped"
            );
        }

        for product in products.iter().take(self.max_records) {
            let view = MetadataView::from_product(product);
            let (document, entry) = if html {
                let document = HtmlDocument { view }.render().map_err(|e| {
                    CatalogueError::Template(format!("HTML metadata render failed: {e}"))
                })?;
                (document, format!("{}.html", product.product_id))
            } else {
                let document = IsoDocument { view }.render().map_err(|e| {
                    CatalogueError::Template(format!("ISO metadata render failed: {e}"))
                })?;
                (document, format!("{}.xml", product.product_id))
            };
            bundle.add_bytes(&entry, document.as_bytes())?;
            let image_path = product.georeferenced_thumbnail(thumbnails_dir);
            if !write_thumb_pair(&mut bundle, &image_path, &product.product_id) {
                summary.thumbnails_skipped += 1;
            }
            summary.records_written += 1;
        }

        summary.duration = started.elapsed();
        tracing::info!(
            name,
            records = summary.records_written,
            capped = summary.records_capped,
            "Metadata export complete"
        );
        let file_name = format!("{}-{}-Metadata.zip", self.acronym, name);
        let payload = DownloadPayload::new(file_name, content_types::ZIP, bundle.finish()?);
        Ok((payload, summary))
    }
}
