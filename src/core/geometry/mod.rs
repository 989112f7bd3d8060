//! Geometry extraction and reprojection
//!
//! Reads WKT footprints off export records, optionally reprojects them to a
//! target spatial reference, and hands polygons to the writers. A record
//! without geometry is a deliberate lossy skip; invalid WKT and transform
//! failures abort the whole export, since a partially written archive cannot
//! be safely truncated.

pub mod srs;

use crate::domain::errors::CatalogueError;
use crate::domain::record::Record;
use crate::domain::result::Result;
use geo_types::{Geometry, LineString, Polygon};
use proj4rs::Proj;
use srs::SrsDef;
use wkt::TryFromWkt;

/// Extracts and reprojects record geometries for one export call
///
/// Both the source and target spatial references are resolved at
/// construction, before any feature is written.
pub struct GeometryExtractor {
    source: &'static SrsDef,
    target: &'static SrsDef,
    source_proj: Proj,
    target_proj: Proj,
}

impl GeometryExtractor {
    /// Create an extractor for the given source code and optional target
    /// reprojection code.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when either code is not registered or
    /// its proj4 definition does not parse.
    pub fn new(source_epsg: u32, target_epsg: Option<u32>) -> Result<Self> {
        let source = srs::resolve(source_epsg)?;
        let target = match target_epsg {
            Some(code) => srs::resolve(code)?,
            None => source,
        };
        let source_proj = Proj::from_proj_string(source.proj4).map_err(|e| {
            CatalogueError::Configuration(format!(
                "Invalid proj4 definition for EPSG:{}: {e}",
                source.epsg
            ))
        })?;
        let target_proj = Proj::from_proj_string(target.proj4).map_err(|e| {
            CatalogueError::Configuration(format!(
                "Invalid proj4 definition for EPSG:{}: {e}",
                target.epsg
            ))
        })?;
        Ok(Self {
            source,
            target,
            source_proj,
            target_proj,
        })
    }

    /// The spatial reference features are written in
    pub fn target(&self) -> &'static SrsDef {
        self.target
    }

    /// Extract the record's polygon, reprojected to the target reference.
    ///
    /// Returns `Ok(None)` when the record has no geometry; the caller still
    /// writes the feature's attributes. Target equal to source is an
    /// identity and leaves coordinates untouched.
    ///
    /// # Errors
    ///
    /// Invalid WKT, a non-polygon geometry, or a transform failure is fatal
    /// for the export.
    pub fn extract(&self, record: &Record) -> Result<Option<Polygon<f64>>> {
        let Some(wkt_text) = record.geometry() else {
            tracing::debug!("Record has no geometry, writing attributes only");
            return Ok(None);
        };

        let geometry: Geometry<f64> = Geometry::try_from_wkt_str(wkt_text)
            .map_err(|e| CatalogueError::Geometry(format!("Invalid WKT: {e}")))?;

        let polygon = match geometry {
            Geometry::Polygon(polygon) => polygon,
            other => {
                return Err(CatalogueError::Geometry(format!(
                    "Expected POLYGON geometry, got {}",
                    geometry_kind(&other)
                )))
            }
        };

        if self.source.epsg == self.target.epsg {
            return Ok(Some(polygon));
        }
        self.transform_polygon(&polygon).map(Some)
    }

    fn transform_polygon(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>> {
        let exterior = self.transform_ring(polygon.exterior())?;
        let interiors = polygon
            .interiors()
            .iter()
            .map(|ring| self.transform_ring(ring))
            .collect::<Result<Vec<_>>>()?;
        Ok(Polygon::new(exterior, interiors))
    }

    fn transform_ring(&self, ring: &LineString<f64>) -> Result<LineString<f64>> {
        let mut coords = Vec::with_capacity(ring.0.len());
        for coord in &ring.0 {
            let mut point = if self.source.geographic {
                (coord.x.to_radians(), coord.y.to_radians(), 0.0)
            } else {
                (coord.x, coord.y, 0.0)
            };
            proj4rs::transform::transform(&self.source_proj, &self.target_proj, &mut point)
                .map_err(|e| {
                    CatalogueError::Geometry(format!(
                        "Transform EPSG:{} -> EPSG:{} failed: {e}",
                        self.source.epsg, self.target.epsg
                    ))
                })?;
            let (x, y) = if self.target.geographic {
                (point.0.to_degrees(), point.1.to_degrees())
            } else {
                (point.0, point.1)
            };
            coords.push(geo_types::coord! { x: x, y: y });
        }
        Ok(LineString::from(coords))
    }
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) => "LINE",
        Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) => "RECT",
        Geometry::Triangle(_) => "TRIANGLE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "POLYGON((20 -30,21 -30,21 -29,20 -29,20 -30))";

    fn record_with_geometry(wkt: &str) -> Record {
        let mut record = Record::new(4326);
        record.set("product_id", "S5-0001");
        record.set_geometry(wkt);
        record
    }

    #[test]
    fn test_missing_geometry_is_skipped_not_an_error() {
        let extractor = GeometryExtractor::new(4326, None).unwrap();
        let record = Record::new(4326);
        assert!(extractor.extract(&record).unwrap().is_none());
    }

    #[test]
    fn test_identity_transform_leaves_coordinates_unchanged() {
        let extractor = GeometryExtractor::new(4326, Some(4326)).unwrap();
        let polygon = extractor
            .extract(&record_with_geometry(SQUARE))
            .unwrap()
            .unwrap();
        let first = polygon.exterior().0[0];
        assert_eq!(first.x, 20.0);
        assert_eq!(first.y, -30.0);
    }

    #[test]
    fn test_reprojection_to_web_mercator_changes_units() {
        let extractor = GeometryExtractor::new(4326, Some(3857)).unwrap();
        let polygon = extractor
            .extract(&record_with_geometry(SQUARE))
            .unwrap()
            .unwrap();
        let first = polygon.exterior().0[0];
        // 20 degrees east is roughly 2.2 million metres
        assert!(first.x > 2_000_000.0, "x was {}", first.x);
        assert!(first.y < 0.0);
    }

    #[test]
    fn test_invalid_wkt_is_fatal() {
        let extractor = GeometryExtractor::new(4326, None).unwrap();
        let record = record_with_geometry("POLYGON((not wkt");
        assert!(matches!(
            extractor.extract(&record),
            Err(CatalogueError::Geometry(_))
        ));
    }

    #[test]
    fn test_non_polygon_geometry_is_fatal() {
        let extractor = GeometryExtractor::new(4326, None).unwrap();
        let record = record_with_geometry("POINT(20 -30)");
        assert!(matches!(
            extractor.extract(&record),
            Err(CatalogueError::Geometry(_))
        ));
    }

    #[test]
    fn test_unknown_target_code_fails_before_extraction() {
        assert!(matches!(
            GeometryExtractor::new(4326, Some(77_777)),
            Err(CatalogueError::Configuration(_))
        ));
    }
}
