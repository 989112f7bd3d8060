//! Spatial reference registry
//!
//! EPSG codes are resolved against a static table decided at startup rather
//! than dispatched through a live library at write time. Each entry carries
//! the proj4 definition used for transforms and the ESRI WKT written into
//! shapefile `.prj` companions. An unknown code is a configuration error
//! raised before any feature is written.

use crate::domain::errors::CatalogueError;
use crate::domain::result::Result;

/// One spatial reference definition
#[derive(Debug)]
pub struct SrsDef {
    /// EPSG code
    pub epsg: u32,
    /// proj4 definition string
    pub proj4: &'static str,
    /// ESRI WKT for `.prj` companions
    pub prj_wkt: &'static str,
    /// True for geographic (degree-based) systems
    pub geographic: bool,
}

const WGS84_GEOGCS: &str = "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",\
SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],\
UNIT[\"Degree\",0.0174532925199433]]";

static SRS_TABLE: &[SrsDef] = &[
    SrsDef {
        epsg: 4326,
        proj4: "+proj=longlat +datum=WGS84 +no_defs",
        prj_wkt: WGS84_GEOGCS,
        geographic: true,
    },
    SrsDef {
        epsg: 3857,
        proj4: "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs",
        prj_wkt: "PROJCS[\"WGS_1984_Web_Mercator_Auxiliary_Sphere\",\
GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",\
SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],\
UNIT[\"Degree\",0.0174532925199433]],PROJECTION[\"Mercator_Auxiliary_Sphere\"],\
PARAMETER[\"False_Easting\",0.0],PARAMETER[\"False_Northing\",0.0],\
PARAMETER[\"Central_Meridian\",0.0],PARAMETER[\"Standard_Parallel_1\",0.0],\
PARAMETER[\"Auxiliary_Sphere_Type\",0.0],UNIT[\"Meter\",1.0]]",
        geographic: false,
    },
    SrsDef {
        epsg: 32733,
        proj4: "+proj=utm +zone=33 +south +datum=WGS84 +units=m +no_defs",
        prj_wkt: "PROJCS[\"WGS_1984_UTM_Zone_33S\",\
GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",\
SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],\
UNIT[\"Degree\",0.0174532925199433]],PROJECTION[\"Transverse_Mercator\"],\
PARAMETER[\"False_Easting\",500000.0],PARAMETER[\"False_Northing\",10000000.0],\
PARAMETER[\"Central_Meridian\",15.0],PARAMETER[\"Scale_Factor\",0.9996],\
PARAMETER[\"Latitude_Of_Origin\",0.0],UNIT[\"Meter\",1.0]]",
        geographic: false,
    },
    SrsDef {
        epsg: 32734,
        proj4: "+proj=utm +zone=34 +south +datum=WGS84 +units=m +no_defs",
        prj_wkt: "PROJCS[\"WGS_1984_UTM_Zone_34S\",\
GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",\
SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],\
UNIT[\"Degree\",0.0174532925199433]],PROJECTION[\"Transverse_Mercator\"],\
PARAMETER[\"False_Easting\",500000.0],PARAMETER[\"False_Northing\",10000000.0],\
PARAMETER[\"Central_Meridian\",21.0],PARAMETER[\"Scale_Factor\",0.9996],\
PARAMETER[\"Latitude_Of_Origin\",0.0],UNIT[\"Meter\",1.0]]",
        geographic: false,
    },
    SrsDef {
        epsg: 32735,
        proj4: "+proj=utm +zone=35 +south +datum=WGS84 +units=m +no_defs",
        prj_wkt: "PROJCS[\"WGS_1984_UTM_Zone_35S\",\
GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",\
SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],\
UNIT[\"Degree\",0.0174532925199433]],PROJECTION[\"Transverse_Mercator\"],\
PARAMETER[\"False_Easting\",500000.0],PARAMETER[\"False_Northing\",10000000.0],\
PARAMETER[\"Central_Meridian\",27.0],PARAMETER[\"Scale_Factor\",0.9996],\
PARAMETER[\"Latitude_Of_Origin\",0.0],UNIT[\"Meter\",1.0]]",
        geographic: false,
    },
];

/// Resolve an EPSG code against the registry.
///
/// The legacy Spherical Mercator code 900913 is accepted as an alias for
/// EPSG:3857.
///
/// # Errors
///
/// Returns a configuration error for codes not in the registry.
pub fn resolve(epsg: u32) -> Result<&'static SrsDef> {
    let epsg = if epsg == 900_913 { 3857 } else { epsg };
    SRS_TABLE.iter().find(|def| def.epsg == epsg).ok_or_else(|| {
        CatalogueError::Configuration(format!(
            "Spatial reference EPSG:{epsg} is not in the registry"
        ))
    })
}

/// All registered EPSG codes
pub fn registered_codes() -> Vec<u32> {
    SRS_TABLE.iter().map(|def| def.epsg).collect()
}
