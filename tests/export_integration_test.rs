//! End-to-end export tests against a configuration loaded from disk

use chrono::{TimeZone, Utc};
use eocat::config::{load_config, CatalogueConfig};
use eocat::core::export::{ExportCoordinator, ExportFormat, ExportOptions};
use eocat::domain::catalogue::{GenericProduct, SearchRecord};
use std::io::{Cursor, Read};
use std::io::Write;
use std::path::Path;

const SQUARE: &str = "POLYGON((20 -30,21 -30,21 -29,20 -29,20 -30))";

fn write_config(thumbnails_dir: &Path) -> tempfile::NamedTempFile {
    let toml_content = format!(
        r#"
[organisation]
acronym = "SANSA"
domain = "catalogue.example.org"

[export]
max_metadata_records = 500
thumbnails_dir = "{}"

[email]
support_address = "support@example.org"
"#,
        thumbnails_dir.display()
    );
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(toml_content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn product(id: &str, geometry: Option<&str>) -> GenericProduct {
    GenericProduct {
        product_id: id.to_string(),
        satellite: "ZASat-2".to_string(),
        instrument_type: "MSS".to_string(),
        product_profile: "Multispectral".to_string(),
        processing_level: "L1G".to_string(),
        owner: "SANSA".to_string(),
        license: "Government".to_string(),
        product_acquisition_start: Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap(),
        product_acquisition_end: None,
        projection: "EPSG:4326".to_string(),
        quality: "Nominal".to_string(),
        geometric_accuracy_mean: Some(4.2),
        geometric_accuracy_1sigma: None,
        geometric_accuracy_2sigma: None,
        spectral_accuracy: None,
        radiometric_signal_to_noise_ratio: None,
        radiometric_percentage_error: None,
        spatial_resolution_x: Some(6.25),
        spatial_resolution_y: Some(6.25),
        spectral_resolution: None,
        radiometric_resolution: Some(10),
        creating_software: "eocat".to_string(),
        original_product_id: None,
        orbit_number: Some(1234),
        product_revision: None,
        path: Some(171),
        path_offset: Some(0),
        row: Some(80),
        row_offset: Some(0),
        spatial_coverage: geometry.map(str::to_string),
    }
}

fn search_record(id: &str, geometry: Option<&str>) -> SearchRecord {
    SearchRecord {
        user: "alice".to_string(),
        order_id: Some(1),
        product: product(id, geometry),
    }
}

fn loaded_config(thumbnails_dir: &Path) -> CatalogueConfig {
    let config_file = write_config(thumbnails_dir);
    load_config(config_file.path()).unwrap()
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
fn test_shapefile_export_writes_all_companions() {
    let thumbs = tempfile::tempdir().unwrap();
    let config = loaded_config(thumbs.path());
    let coordinator = ExportCoordinator::new(&config);

    // One record has no footprint yet; it must keep its attribute row
    let records = vec![
        search_record("S5-0001", Some(SQUARE)),
        search_record("S5-0002", None),
        search_record("S5-0003", Some(SQUARE)),
    ];
    let (payload, summary) = coordinator
        .export_search_records(
            &records,
            ExportFormat::Shapefile,
            &ExportOptions::new("records"),
        )
        .unwrap();

    assert_eq!(payload.file_name, "records.zip");
    assert_eq!(
        entry_names(&payload.body),
        vec!["records.shp", "records.shx", "records.dbf", "records.prj"]
    );
    assert_eq!(summary.records_written, 3);
    assert_eq!(summary.geometries_written, 2);

    let dbf = entry_bytes(&payload.body, "records.dbf");
    let mut reader = shapefile::dbase::Reader::new(Cursor::new(dbf)).unwrap();
    assert_eq!(reader.read().unwrap().len(), 3);

    let shp = entry_bytes(&payload.body, "records.shp");
    let mut reader = shapefile::ShapeReader::new(Cursor::new(shp)).unwrap();
    assert_eq!(reader.iter_shapes().count(), 2);
}

#[test]
fn test_download_headers_report_exact_length() {
    let thumbs = tempfile::tempdir().unwrap();
    let config = loaded_config(thumbs.path());
    let coordinator = ExportCoordinator::new(&config);

    let records = vec![search_record("S5-0001", Some(SQUARE))];
    let (payload, _) = coordinator
        .export_search_records(
            &records,
            ExportFormat::Shapefile,
            &ExportOptions::new("records"),
        )
        .unwrap();

    let headers = payload.headers();
    assert!(headers.contains(&("Content-Type", "application/zip".to_string())));
    assert!(headers.contains(&(
        "Content-Disposition",
        "attachment; filename=records.zip".to_string()
    )));
    assert!(headers.contains(&("Content-Length", payload.body.len().to_string())));
}

#[test]
fn test_metadata_export_capped_and_named() {
    let thumbs = tempfile::tempdir().unwrap();
    let config = loaded_config(thumbs.path());
    let coordinator = ExportCoordinator::new(&config);

    let records: Vec<_> = (0..600)
        .map(|i| search_record(&format!("S5-{i:04}"), Some(SQUARE)))
        .collect();
    let (payload, summary) = coordinator
        .export_search_records(
            &records,
            ExportFormat::IsoMetadata,
            &ExportOptions::new("search1234"),
        )
        .unwrap();

    assert_eq!(payload.file_name, "SANSA-search1234-Metadata.zip");
    assert_eq!(summary.records_written, 500);
    assert_eq!(summary.records_capped, 100);
    assert_eq!(entry_names(&payload.body).len(), 500);
}

#[test]
fn test_iso_metadata_export_bundles_thumbnails() {
    let thumbs = tempfile::tempdir().unwrap();
    std::fs::write(thumbs.path().join("S5-0001.jpg"), b"jpeg").unwrap();
    std::fs::write(thumbs.path().join("S5-0001.wld"), b"world").unwrap();

    let config = loaded_config(thumbs.path());
    let coordinator = ExportCoordinator::new(&config);

    let records = vec![search_record("S5-0001", Some(SQUARE))];
    let (payload, summary) = coordinator
        .export_search_records(
            &records,
            ExportFormat::IsoMetadata,
            &ExportOptions::new("search77"),
        )
        .unwrap();

    assert_eq!(
        entry_names(&payload.body),
        vec!["S5-0001.xml", "S5-0001.jpg", "S5-0001.wld"]
    );
    assert_eq!(summary.thumbnails_skipped, 0);
}

#[test]
fn test_kml_export_renders_wgs84_placemarks() {
    let thumbs = tempfile::tempdir().unwrap();
    let config = loaded_config(thumbs.path());
    let coordinator = ExportCoordinator::new(&config);

    let records = vec![search_record("S5-0001", Some(SQUARE))];
    let (payload, _) = coordinator
        .export_search_records(&records, ExportFormat::Kml, &ExportOptions::new("records"))
        .unwrap();

    assert_eq!(
        payload.content_type,
        "application/vnd.google-earth.kml+xml"
    );
    let document = String::from_utf8(payload.body).unwrap();
    assert!(document.contains("<name>S5-0001</name>"));
    assert!(document.contains("20,-30,0"));
}

#[test]
fn test_kmz_export_bundles_existing_thumbnails() {
    let thumbs = tempfile::tempdir().unwrap();
    std::fs::write(thumbs.path().join("S5-0001.jpg"), b"jpeg").unwrap();
    std::fs::write(thumbs.path().join("S5-0001.wld"), b"world").unwrap();

    let config = loaded_config(thumbs.path());
    let coordinator = ExportCoordinator::new(&config);

    let records = vec![
        search_record("S5-0001", Some(SQUARE)),
        search_record("S5-0002", Some(SQUARE)),
    ];
    let (payload, summary) = coordinator
        .export_search_records(&records, ExportFormat::Kmz, &ExportOptions::new("records"))
        .unwrap();

    let names = entry_names(&payload.body);
    assert!(names.contains(&"doc.kml".to_string()));
    assert!(names.contains(&"S5-0001.jpg".to_string()));
    assert!(names.contains(&"S5-0001.wld".to_string()));
    // The second record has no thumbnail on disk
    assert_eq!(summary.thumbnails_skipped, 1);
}

#[test]
fn test_shapefile_reprojection_writes_matching_prj() {
    let thumbs = tempfile::tempdir().unwrap();
    let config = loaded_config(thumbs.path());
    let coordinator = ExportCoordinator::new(&config);

    let records = vec![search_record("S5-0001", Some(SQUARE))];
    let options = ExportOptions {
        file_stem: "records".to_string(),
        target_epsg: Some(32734),
        readme: None,
    };
    let (payload, _) = coordinator
        .export_search_records(&records, ExportFormat::Shapefile, &options)
        .unwrap();

    let prj = String::from_utf8(entry_bytes(&payload.body, "records.prj")).unwrap();
    assert!(prj.contains("UTM_Zone_34S"));
}
