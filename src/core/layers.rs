//! Map layer definitions
//!
//! The embedded map widgets are driven by a fixed table of WMS layer
//! definitions rendered into request URLs, instead of pre-baked snippet
//! strings. The cart layer is scoped to a user and refuses to render
//! without one.

use crate::domain::errors::CatalogueError;
use crate::domain::result::Result;

/// One WMS layer the map widgets can request
#[derive(Debug)]
pub struct LayerDefinition {
    /// Stable lookup key
    pub key: &'static str,
    /// Display title
    pub title: &'static str,
    /// WMS layer name on the map server
    pub layers: &'static str,
    /// Image format requested from the server
    pub format: &'static str,
    /// Overlay layers are requested with a transparent background
    pub transparent: bool,
    /// Per-user layers require a username query parameter
    pub requires_user: bool,
}

static LAYER_TABLE: &[LayerDefinition] = &[
    LayerDefinition {
        key: "blue-marble",
        title: "Blue Marble",
        layers: "BlueMarble",
        format: "image/jpeg",
        transparent: false,
        requires_user: false,
    },
    LayerDefinition {
        key: "za-spot-mosaic",
        title: "SPOT5 2m Mosaic",
        layers: "ZaSpot2mMosaic",
        format: "image/jpeg",
        transparent: false,
        requires_user: false,
    },
    LayerDefinition {
        key: "searches",
        title: "Search footprints",
        layers: "searches",
        format: "image/png",
        transparent: true,
        requires_user: false,
    },
    LayerDefinition {
        key: "visits",
        title: "Visitor locations",
        layers: "visits",
        format: "image/png",
        transparent: true,
        requires_user: false,
    },
    LayerDefinition {
        key: "cart",
        title: "Cart contents",
        layers: "cart",
        format: "image/png",
        transparent: true,
        requires_user: true,
    },
];

/// Map widget audience, decides which layers are offered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserProfile {
    Anonymous,
    Authenticated,
}

/// All registered layers, in listing order
pub fn registered_layers() -> &'static [LayerDefinition] {
    LAYER_TABLE
}

/// The layer list offered to a user profile.
///
/// User-scoped layers such as the cart are withheld from anonymous
/// visitors; everything else is offered to both profiles.
pub fn standard_layers(profile: UserProfile) -> Vec<&'static LayerDefinition> {
    LAYER_TABLE
        .iter()
        .filter(|layer| profile == UserProfile::Authenticated || !layer.requires_user)
        .collect()
}

/// Resolve a layer key against the table.
///
/// # Errors
///
/// Returns a configuration error for keys not in the table.
pub fn resolve(key: &str) -> Result<&'static LayerDefinition> {
    LAYER_TABLE
        .iter()
        .find(|layer| layer.key == key)
        .ok_or_else(|| {
            CatalogueError::Configuration(format!("Map layer '{key}' is not in the layer table"))
        })
}

impl LayerDefinition {
    /// Render the WMS request URL for this layer.
    ///
    /// # Errors
    ///
    /// A per-user layer without a username is a validation error.
    pub fn render_url(&self, wms_server: &str, username: Option<&str>) -> Result<String> {
        let mut url = format!(
            "https://{}/wms?layers={}&format={}&transparent={}",
            wms_server, self.layers, self.format, self.transparent
        );
        if self.requires_user {
            let Some(username) = username else {
                return Err(CatalogueError::Validation(format!(
                    "Layer '{}' is user-scoped and needs a username",
                    self.key
                )));
            };
            url.push_str(&format!("&user={username}"));
        }
        Ok(url)
    }
}
