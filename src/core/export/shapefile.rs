//! Shapefile export
//!
//! Writes the four shapefile companions into a scratch directory, then
//! packages them into a single zip payload. Attribute rows and shapes are
//! written by separate writers: every record gets a DBF row, while only
//! records that carry a geometry contribute a shape. The scratch directory
//! is removed as soon as packaging finishes, whether or not it succeeded.

use crate::core::archive::{content_types, DownloadPayload, ZipBundle};
use crate::core::attributes::AttributeSpec;
use crate::core::export::summary::ExportSummary;
use crate::core::geometry::GeometryExtractor;
use crate::domain::errors::CatalogueError;
use crate::domain::record::Record;
use crate::domain::result::Result;
use shapefile::dbase;
use std::path::Path;
use std::time::Instant;

/// Writes a record set as a zipped shapefile
pub struct ShapefileExporter<'a> {
    spec: &'a AttributeSpec,
    extractor: &'a GeometryExtractor,
}

impl<'a> ShapefileExporter<'a> {
    pub fn new(spec: &'a AttributeSpec, extractor: &'a GeometryExtractor) -> Self {
        Self { spec, extractor }
    }

    /// Export the records under the given file stem.
    ///
    /// The payload is named `{stem}.zip` and contains `{stem}.shp`,
    /// `{stem}.shx`, `{stem}.dbf` and `{stem}.prj`, plus an optional
    /// `README.txt`.
    pub fn export(
        &self,
        records: &[Record],
        file_stem: &str,
        readme: Option<&str>,
    ) -> Result<(DownloadPayload, ExportSummary)> {
        let started = Instant::now();
        let scratch = tempfile::tempdir().map_err(|e| {
            CatalogueError::Export(format!("Cannot create scratch directory: {e}"))
        })?;

        let mut summary = ExportSummary::new();
        let mut shapes = Vec::new();
        let mut rows = Vec::new();

        for record in records {
            rows.push(self.attribute_row(record));
            summary.records_written += 1;
            if let Some(polygon) = self.extractor.extract(record)? {
                shapes.push(to_shapefile_polygon(&polygon));
                summary.geometries_written += 1;
            }
        }

        self.write_companions(scratch.path(), file_stem, shapes, rows)?;
        let body = self.package(scratch.path(), file_stem, readme)?;

        summary.duration = started.elapsed();
        tracing::info!(
            file_stem,
            records = summary.records_written,
            geometries = summary.geometries_written,
            "Shapefile export complete"
        );

        let payload = DownloadPayload::new(format!("{file_stem}.zip"), content_types::ZIP, body);
        Ok((payload, summary))
    }

    fn attribute_row(&self, record: &Record) -> dbase::Record {
        let mut row = dbase::Record::default();
        for (column, value) in self.spec.project(record) {
            row.insert(column, dbase::FieldValue::Character(Some(value)));
        }
        row
    }

    fn write_companions(
        &self,
        dir: &Path,
        file_stem: &str,
        shapes: Vec<shapefile::Polygon>,
        rows: Vec<dbase::Record>,
    ) -> Result<()> {
        let shp_path = dir.join(format!("{file_stem}.shp"));
        let shape_writer = shapefile::ShapeWriter::from_path(&shp_path)
            .map_err(|e| CatalogueError::Export(format!("Cannot open shape writer: {e}")))?;
        shape_writer
            .write_shapes(&shapes)
            .map_err(|e| CatalogueError::Export(format!("Shape write failed: {e}")))?;

        let mut table_builder = dbase::TableWriterBuilder::new();
        for field in self.spec.iter() {
            let name = dbase::FieldName::try_from(field.column()).map_err(|e| {
                CatalogueError::Export(format!(
                    "Column '{}' is not a valid DBF field name: {e:?}",
                    field.column()
                ))
            })?;
            table_builder = table_builder.add_character_field(name, field.width());
        }
        let dbf_path = dir.join(format!("{file_stem}.dbf"));
        let table_writer = table_builder
            .build_with_file_dest(&dbf_path)
            .map_err(|e| CatalogueError::Export(format!("Cannot open table writer: {e}")))?;
        table_writer
            .write_records(&rows)
            .map_err(|e| CatalogueError::Export(format!("Attribute write failed: {e}")))?;

        let prj_path = dir.join(format!("{file_stem}.prj"));
        std::fs::write(&prj_path, self.extractor.target().prj_wkt)?;
        Ok(())
    }

    fn package(&self, dir: &Path, file_stem: &str, readme: Option<&str>) -> Result<Vec<u8>> {
        let mut bundle = ZipBundle::new();
        for extension in ["shp", "shx", "dbf", "prj"] {
            let name = format!("{file_stem}.{extension}");
            bundle.add_file(&name, &dir.join(&name))?;
        }
        if let Some(text) = readme {
            bundle.add_readme(text)?;
        }
        bundle.finish()
    }
}

/// Convert a geo polygon into a shapefile polygon.
///
/// Ring closure and winding order are normalised by the shapefile writer.
fn to_shapefile_polygon(polygon: &geo_types::Polygon<f64>) -> shapefile::Polygon {
    let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
    rings.push(shapefile::PolygonRing::Outer(ring_points(
        polygon.exterior(),
    )));
    for interior in polygon.interiors() {
        rings.push(shapefile::PolygonRing::Inner(ring_points(interior)));
    }
    shapefile::Polygon::with_rings(rings)
}

fn ring_points(ring: &geo_types::LineString<f64>) -> Vec<shapefile::Point> {
    ring.0
        .iter()
        .map(|coord| shapefile::Point::new(coord.x, coord.y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    const SQUARE: &str = "POLYGON((20 -30,21 -30,21 -29,20 -29,20 -30))";

    fn record(id: &str, geometry: Option<&str>) -> Record {
        let mut record = Record::new(4326);
        record.set("product_id", id);
        record.set("satellite", "ZASat-2");
        if let Some(wkt) = geometry {
            record.set_geometry(wkt);
        }
        record
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    fn entry_bytes(bytes: &[u8], name: &str) -> Vec<u8> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut body = Vec::new();
        entry.read_to_end(&mut body).unwrap();
        body
    }

    #[test]
    fn test_archive_has_four_companions() {
        let spec = AttributeSpec::catalogue_products(255);
        let extractor = GeometryExtractor::new(4326, None).unwrap();
        let exporter = ShapefileExporter::new(&spec, &extractor);
        let (payload, summary) = exporter
            .export(&[record("S5-0001", Some(SQUARE))], "records", None)
            .unwrap();

        assert_eq!(payload.file_name, "records.zip");
        assert_eq!(
            entry_names(&payload.body),
            vec!["records.shp", "records.shx", "records.dbf", "records.prj"]
        );
        assert_eq!(summary.records_written, 1);
        assert_eq!(summary.geometries_written, 1);
    }

    #[test]
    fn test_record_without_geometry_still_gets_attribute_row() {
        let spec = AttributeSpec::catalogue_products(255);
        let extractor = GeometryExtractor::new(4326, None).unwrap();
        let exporter = ShapefileExporter::new(&spec, &extractor);
        let records = vec![
            record("S5-0001", Some(SQUARE)),
            record("S5-0002", None),
            record("S5-0003", Some(SQUARE)),
        ];
        let (payload, summary) = exporter.export(&records, "records", None).unwrap();

        assert_eq!(summary.records_written, 3);
        assert_eq!(summary.geometries_written, 2);
        assert_eq!(summary.geometries_skipped(), 1);

        let dbf = entry_bytes(&payload.body, "records.dbf");
        let mut reader = shapefile::dbase::Reader::new(Cursor::new(dbf)).unwrap();
        assert_eq!(reader.read().unwrap().len(), 3);

        let shp = entry_bytes(&payload.body, "records.shp");
        let mut reader = shapefile::ShapeReader::new(Cursor::new(shp)).unwrap();
        assert_eq!(reader.iter_shapes().count(), 2);
    }

    #[test]
    fn test_readme_entry_is_appended() {
        let spec = AttributeSpec::tasking_requests(255);
        let extractor = GeometryExtractor::new(4326, None).unwrap();
        let exporter = ShapefileExporter::new(&spec, &extractor);
        let (payload, _) = exporter
            .export(&[], "requests", Some("Tasking request footprints"))
            .unwrap();
        assert!(entry_names(&payload.body).contains(&"README.txt".to_string()));
    }

    #[test]
    fn test_prj_matches_target_reference() {
        let spec = AttributeSpec::catalogue_products(255);
        let extractor = GeometryExtractor::new(4326, Some(32734)).unwrap();
        let exporter = ShapefileExporter::new(&spec, &extractor);
        let (payload, _) = exporter
            .export(&[record("S5-0001", Some(SQUARE))], "records", None)
            .unwrap();
        let prj = String::from_utf8(entry_bytes(&payload.body, "records.prj")).unwrap();
        assert!(prj.contains("UTM_Zone_34S"));
    }

    #[test]
    fn test_invalid_wkt_aborts_export() {
        let spec = AttributeSpec::catalogue_products(255);
        let extractor = GeometryExtractor::new(4326, None).unwrap();
        let exporter = ShapefileExporter::new(&spec, &extractor);
        let result = exporter.export(&[record("S5-0001", Some("POLYGON(("))], "records", None);
        assert!(matches!(result, Err(CatalogueError::Geometry(_))));
    }
}
