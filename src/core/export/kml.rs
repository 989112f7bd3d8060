//! KML and KMZ export
//!
//! Features are rendered as placemarks with an HTML attribute table in the
//! description. KML viewers expect WGS84 coordinates, so this exporter
//! always reprojects to EPSG:4326 regardless of any requested target
//! reference. The KMZ variant wraps the document together with the
//! products' georeferenced thumbnails.

use crate::core::archive::{content_types, write_thumb_pair, DownloadPayload, ZipBundle};
use crate::core::attributes::AttributeSpec;
use crate::core::export::summary::ExportSummary;
use crate::core::geometry::GeometryExtractor;
use crate::domain::errors::CatalogueError;
use crate::domain::record::Record;
use crate::domain::result::Result;
use askama::Template;
use std::path::Path;
use std::time::Instant;

#[derive(Template)]
#[template(path = "records.kml", escape = "html")]
struct KmlDocument<'a> {
    document_name: &'a str,
    placemarks: &'a [Placemark],
}

struct Placemark {
    name: String,
    description: String,
    coordinates: Option<String>,
}

/// Writes a record set as a KML document or KMZ archive
pub struct KmlExporter<'a> {
    spec: &'a AttributeSpec,
    extractor: GeometryExtractor,
}

impl<'a> KmlExporter<'a> {
    /// Create an exporter for records in the given source reference.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the source code is not registered.
    pub fn new(spec: &'a AttributeSpec, source_epsg: u32) -> Result<Self> {
        let extractor = GeometryExtractor::new(source_epsg, Some(4326))?;
        Ok(Self { spec, extractor })
    }

    /// Export the records as a standalone `.kml` document
    pub fn export_kml(
        &self,
        records: &[Record],
        file_stem: &str,
    ) -> Result<(DownloadPayload, ExportSummary)> {
        let started = Instant::now();
        let (document, mut summary) = self.render(records, file_stem)?;
        summary.duration = started.elapsed();
        tracing::info!(file_stem, records = summary.records_written, "KML export complete");
        let payload = DownloadPayload::new(
            format!("{file_stem}.kml"),
            content_types::KML,
            document.into_bytes(),
        );
        Ok((payload, summary))
    }

    /// Export the records as a `.kmz` archive with thumbnails.
    ///
    /// Thumbnail pairs are bundled for at most `max_thumbnails` records.
    /// A record without a `product_id` field, or whose thumbnail pair is
    /// missing on disk, is counted as a skipped thumbnail and the export
    /// carries on.
    pub fn export_kmz(
        &self,
        records: &[Record],
        file_stem: &str,
        thumbnails_dir: &Path,
        max_thumbnails: usize,
    ) -> Result<(DownloadPayload, ExportSummary)> {
        let started = Instant::now();
        let (document, mut summary) = self.render(records, file_stem)?;

        let mut bundle = ZipBundle::new();
        bundle.add_bytes("doc.kml", document.as_bytes())?;
        for record in records.iter().take(max_thumbnails) {
            let Some(product_id) = record.field("product_id").and_then(|v| v.as_text()) else {
                summary.thumbnails_skipped += 1;
                continue;
            };
            let image_path = thumbnails_dir.join(format!("{product_id}.jpg"));
            if !write_thumb_pair(&mut bundle, &image_path, &product_id) {
                summary.thumbnails_skipped += 1;
            }
        }

        summary.duration = started.elapsed();
        tracing::info!(
            file_stem,
            records = summary.records_written,
            thumbnails_skipped = summary.thumbnails_skipped,
            "KMZ export complete"
        );
        let payload = DownloadPayload::new(
            format!("{file_stem}.kmz"),
            content_types::KMZ,
            bundle.finish()?,
        );
        Ok((payload, summary))
    }

    fn render(&self, records: &[Record], document_name: &str) -> Result<(String, ExportSummary)> {
        let mut summary = ExportSummary::new();
        let mut placemarks = Vec::with_capacity(records.len());
        for record in records {
            let coordinates = self
                .extractor
                .extract(record)?
                .map(|polygon| ring_coordinates(polygon.exterior()));
            if coordinates.is_some() {
                summary.geometries_written += 1;
            }
            placemarks.push(Placemark {
                name: self.placemark_name(record),
                description: self.description_table(record),
                coordinates,
            });
            summary.records_written += 1;
        }
        let document = KmlDocument {
            document_name,
            placemarks: &placemarks,
        }
        .render()
        .map_err(|e| CatalogueError::Template(format!("KML render failed: {e}")))?;
        Ok((document, summary))
    }

    fn placemark_name(&self, record: &Record) -> String {
        record
            .field("product_id")
            .or_else(|| record.field("id"))
            .and_then(|v| v.as_text())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Record".to_string())
    }

    /// HTML attribute table for the placemark description (CDATA body)
    fn description_table(&self, record: &Record) -> String {
        let mut html = String::from("<table>");
        for (column, value) in self.spec.project(record) {
            html.push_str(&format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                escape_html(&column),
                escape_html(&value)
            ));
        }
        html.push_str("</table>");
        html
    }
}

fn ring_coordinates(ring: &geo_types::LineString<f64>) -> String {
    ring.0
        .iter()
        .map(|coord| format!("{},{},0", coord.x, coord.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
