//! Catalogue domain models
//!
//! Plain data structs for the slice of the catalogue this crate exports:
//! generic imagery products, the search records that reference them, tasking
//! requests, and orders with their status history. Collections of these are
//! fed to the exporters and the notification composer as explicit lists; the
//! hosting application owns persistence.

use crate::domain::record::{Record, ScalarValue};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Spatial reference of catalogue footprints (WGS84 lat/long)
pub const CATALOGUE_SRID: u32 = 4326;

/// A generic satellite imagery product
///
/// Carries the full catalogue attribute set; optional numeric fields are
/// simply absent on products from sensors that do not report them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericProduct {
    pub product_id: String,
    pub satellite: String,
    pub instrument_type: String,
    pub product_profile: String,
    pub processing_level: String,
    pub owner: String,
    pub license: String,
    pub product_acquisition_start: DateTime<Utc>,
    pub product_acquisition_end: Option<DateTime<Utc>>,
    pub projection: String,
    pub quality: String,
    pub geometric_accuracy_mean: Option<f64>,
    pub geometric_accuracy_1sigma: Option<f64>,
    pub geometric_accuracy_2sigma: Option<f64>,
    pub spectral_accuracy: Option<f64>,
    pub radiometric_signal_to_noise_ratio: Option<f64>,
    pub radiometric_percentage_error: Option<f64>,
    pub spatial_resolution_x: Option<f64>,
    pub spatial_resolution_y: Option<f64>,
    pub spectral_resolution: Option<f64>,
    pub radiometric_resolution: Option<i64>,
    pub creating_software: String,
    pub original_product_id: Option<String>,
    pub orbit_number: Option<i64>,
    pub product_revision: Option<String>,
    pub path: Option<i64>,
    pub path_offset: Option<i64>,
    pub row: Option<i64>,
    pub row_offset: Option<i64>,
    /// Footprint as WKT (EPSG:4326); products awaiting ingestion may lack one
    pub spatial_coverage: Option<String>,
}

impl GenericProduct {
    /// Project the product into a flat export record
    pub fn to_record(&self) -> Record {
        let mut record = Record::new(CATALOGUE_SRID);
        record
            .set("product_id", self.product_id.as_str())
            .set("satellite", self.satellite.as_str())
            .set("instrument_type", self.instrument_type.as_str())
            .set("product_profile", self.product_profile.as_str())
            .set("processing_level", self.processing_level.as_str())
            .set("owner", self.owner.as_str())
            .set("license", self.license.as_str())
            .set(
                "product_acquisition_start",
                ScalarValue::Timestamp(self.product_acquisition_start),
            )
            .set(
                "product_acquisition_end",
                match self.product_acquisition_end {
                    Some(end) => ScalarValue::Timestamp(end),
                    None => ScalarValue::Null,
                },
            )
            .set("projection", self.projection.as_str())
            .set("quality", self.quality.as_str())
            .set("geometric_accuracy_mean", self.geometric_accuracy_mean)
            .set("geometric_accuracy_1sigma", self.geometric_accuracy_1sigma)
            .set("geometric_accuracy_2sigma", self.geometric_accuracy_2sigma)
            .set("spectral_accuracy", self.spectral_accuracy)
            .set(
                "radiometric_signal_to_noise_ratio",
                self.radiometric_signal_to_noise_ratio,
            )
            .set(
                "radiometric_percentage_error",
                self.radiometric_percentage_error,
            )
            .set("spatial_resolution_x", self.spatial_resolution_x)
            .set("spatial_resolution_y", self.spatial_resolution_y)
            .set("spectral_resolution", self.spectral_resolution)
            .set("radiometric_resolution", self.radiometric_resolution)
            .set("creating_software", self.creating_software.as_str())
            .set("original_product_id", self.original_product_id.clone())
            .set("orbit_number", self.orbit_number)
            .set("product_revision", self.product_revision.clone())
            .set("path", self.path)
            .set("path_offset", self.path_offset)
            .set("row", self.row)
            .set("row_offset", self.row_offset);
        if let Some(wkt) = &self.spatial_coverage {
            record.set_geometry(wkt.clone());
        }
        record
    }

    /// Path of the product's georeferenced thumbnail under `thumbnails_dir`
    pub fn georeferenced_thumbnail(&self, thumbnails_dir: &Path) -> PathBuf {
        thumbnails_dir.join(format!("{}.jpg", self.product_id))
    }
}

/// A catalogue user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
}

/// A search record linking a user (and optionally an order) to a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    pub user: String,
    pub order_id: Option<u64>,
    pub product: GenericProduct,
}

/// A tasking request for future acquisition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskingRequest {
    pub id: u64,
    pub satellite_instrument_group: String,
    pub target_date: NaiveDate,
    /// Requested coverage as WKT (EPSG:4326)
    pub geometry: Option<String>,
}

impl TaskingRequest {
    pub fn to_record(&self) -> Record {
        let mut record = Record::new(CATALOGUE_SRID);
        record
            .set("id", self.id as i64)
            .set(
                "satellite_instrument_group",
                self.satellite_instrument_group.as_str(),
            )
            .set("target_date", ScalarValue::Date(self.target_date));
        if let Some(wkt) = &self.geometry {
            record.set_geometry(wkt.clone());
        }
        record
    }
}

/// Delivery details attached to an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryDetail {
    pub delivery_method: String,
    /// Clip geometry as WKT (EPSG:4326)
    pub geometry: Option<String>,
}

/// An imagery order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub user: User,
    pub notes: String,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub delivery_detail: DeliveryDetail,
}

impl Order {
    /// Project the order's delivery details into a flat export record
    pub fn to_delivery_record(&self) -> Record {
        let mut record = Record::new(CATALOGUE_SRID);
        record
            .set("user", self.user.username.as_str())
            .set("notes", self.notes.as_str())
            .set("delivery_method", self.delivery_detail.delivery_method.as_str())
            .set("order_date", ScalarValue::Timestamp(self.order_date));
        if let Some(wkt) = &self.delivery_detail.geometry {
            record.set_geometry(wkt.clone());
        }
        record
    }
}

/// One entry in an order's status history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusHistory {
    pub order_id: u64,
    pub old_status: String,
    pub new_status: String,
    pub changed_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

/// Users subscribed to order notifications for a satellite's products
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSubscription {
    pub satellite: String,
    pub recipients: Vec<User>,
}

impl ProductSubscription {
    /// Users subscribed to notifications for the given product
    pub fn users_for_product<'a>(
        subscriptions: &'a [ProductSubscription],
        product: &GenericProduct,
    ) -> Vec<&'a User> {
        subscriptions
            .iter()
            .filter(|s| s.satellite == product.satellite)
            .flat_map(|s| s.recipients.iter())
            .collect()
    }
}

#[cfg(test)]
pub mod fixtures {
    //! Shared builders for unit and integration tests

    use super::*;
    use chrono::TimeZone;

    pub fn product(id: &str) -> GenericProduct {
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
            spatial_coverage: Some(
                "POLYGON((20 -30,21 -30,21 -29,20 -29,20 -30))".to_string(),
            ),
        }
    }

    pub fn search_record(id: &str, user: &str) -> SearchRecord {
        SearchRecord {
            user: user.to_string(),
            order_id: Some(1),
            product: product(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures;
    use super::*;

    #[test]
    fn test_product_record_has_geometry_and_fields() {
        let record = fixtures::product("S5-001").to_record();
        assert_eq!(record.srid(), CATALOGUE_SRID);
        assert!(record.geometry().is_some());
        assert_eq!(
            record.field("product_id").unwrap().as_text(),
            Some("S5-001".to_string())
        );
        // Absent numeric field projects to Null, not a missing key
        assert_eq!(
            record.field("spectral_accuracy").unwrap().as_text(),
            Some(String::new())
        );
    }

    #[test]
    fn test_thumbnail_path_uses_product_id() {
        let product = fixtures::product("S5-001");
        let path = product.georeferenced_thumbnail(Path::new("/var/thumbs"));
        assert_eq!(path, PathBuf::from("/var/thumbs/S5-001.jpg"));
    }

    #[test]
    fn test_subscription_lookup_matches_satellite() {
        let product = fixtures::product("S5-001");
        let subscriptions = vec![
            ProductSubscription {
                satellite: "ZASat-2".to_string(),
                recipients: vec![User {
                    username: "sales1".to_string(),
                    email: "sales1@example.org".to_string(),
                }],
            },
            ProductSubscription {
                satellite: "OtherSat".to_string(),
                recipients: vec![User {
                    username: "sales2".to_string(),
                    email: "sales2@example.org".to_string(),
                }],
            },
        ];
        let users = ProductSubscription::users_for_product(&subscriptions, &product);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "sales1");
    }
}
