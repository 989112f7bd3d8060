//! Attribute specs and the attribute projector
//!
//! An [`AttributeSpec`] is the ordered list of record fields that become
//! output columns. Column names are limited to 10 characters for DBF
//! compatibility. Ad-hoc specs built with [`AttributeSpec::new`] truncate
//! automatically and reject two names that truncate to the same key; the
//! built-in catalogue specs carry hand-picked short names instead, because
//! several of the long catalogue attribute names would otherwise collide
//! (for example `product_acquisition_start` and `product_acquisition_end`).

use crate::domain::errors::CatalogueError;
use crate::domain::record::Record;
use crate::domain::result::Result;
use std::collections::BTreeSet;

/// Maximum DBF field name length
pub const MAX_FIELD_NAME_LEN: usize = 10;

/// One output column
#[derive(Debug, Clone)]
pub struct AttributeField {
    source: String,
    column: String,
    width: u8,
}

impl AttributeField {
    /// The record field this column reads from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The DBF-safe column name (<= 10 characters)
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Maximum character width of the column
    pub fn width(&self) -> u8 {
        self.width
    }
}

/// Ordered list of output columns for one record family
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    fields: Vec<AttributeField>,
}

impl AttributeSpec {
    /// Build a spec from `(field name, width)` pairs, truncating names to
    /// the DBF limit.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when two field names truncate to the
    /// same 10-character key.
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        let named = fields.into_iter().map(|(name, width)| {
            let name = name.into();
            let column = truncate_name(&name).to_string();
            (name, column, width)
        });
        Self::with_columns(named)
    }

    /// Build a spec with explicit column names.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a column name exceeds the DBF
    /// limit or duplicates an earlier one.
    pub fn with_columns<I, S, C>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, C, u8)>,
        S: Into<String>,
        C: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for (source, column, width) in fields {
            let source = source.into();
            let column = column.into();
            if column.len() > MAX_FIELD_NAME_LEN {
                return Err(CatalogueError::Configuration(format!(
                    "Column name '{column}' exceeds {MAX_FIELD_NAME_LEN} characters"
                )));
            }
            if !seen.insert(column.clone()) {
                return Err(CatalogueError::Configuration(format!(
                    "Attribute field '{source}' maps to column '{column}', which collides \
                     with an earlier field"
                )));
            }
            out.push(AttributeField {
                source,
                column,
                width,
            });
        }
        Ok(Self { fields: out })
    }

    /// The catalogue product attribute set
    pub fn catalogue_products(width: u8) -> Self {
        let fields = [
            ("product_id", "product_id"),
            ("satellite", "satellite"),
            ("instrument_type", "instrument"),
            ("product_profile", "profile"),
            ("processing_level", "proc_level"),
            ("owner", "owner"),
            ("license", "license"),
            ("product_acquisition_start", "acq_start"),
            ("product_acquisition_end", "acq_end"),
            ("projection", "projection"),
            ("quality", "quality"),
            ("geometric_accuracy_mean", "geom_mean"),
            ("geometric_accuracy_1sigma", "geom_1sig"),
            ("geometric_accuracy_2sigma", "geom_2sig"),
            ("spectral_accuracy", "spec_accur"),
            ("radiometric_signal_to_noise_ratio", "rad_snr"),
            ("radiometric_percentage_error", "rad_pc_err"),
            ("spatial_resolution_x", "spat_res_x"),
            ("spatial_resolution_y", "spat_res_y"),
            ("spectral_resolution", "spec_res"),
            ("radiometric_resolution", "rad_res"),
            ("creating_software", "software"),
            ("original_product_id", "orig_id"),
            ("orbit_number", "orbit"),
            ("product_revision", "revision"),
            ("path", "path"),
            ("path_offset", "path_off"),
            ("row", "row"),
            ("row_offset", "row_off"),
        ];
        Self::with_columns(fields.into_iter().map(|(s, c)| (s, c, width)))
            .expect("catalogue product columns are unique and within the DBF limit")
    }

    /// The tasking request attribute set
    pub fn tasking_requests(width: u8) -> Self {
        Self::with_columns([
            ("id", "id", width),
            ("satellite_instrument_group", "sat_group", width),
            ("target_date", "targetdate", width),
        ])
        .expect("tasking request columns are unique and within the DBF limit")
    }

    /// The order delivery attribute set
    pub fn order_deliveries(width: u8) -> Self {
        Self::with_columns([
            ("user", "user", width),
            ("notes", "notes", width),
            ("delivery_method", "deliv_meth", width),
            ("order_date", "order_date", width),
        ])
        .expect("order delivery columns are unique and within the DBF limit")
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the spec has no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over columns in output order
    pub fn iter(&self) -> impl Iterator<Item = &AttributeField> {
        self.fields.iter()
    }

    /// Project a record into `(column name, value)` pairs.
    ///
    /// Always yields exactly `len()` entries. A missing field or a value
    /// with no text representation becomes an empty string; the latter is
    /// logged but never raised.
    pub fn project(&self, record: &Record) -> Vec<(String, String)> {
        self.fields
            .iter()
            .map(|field| {
                let value = match record.field(field.source()) {
                    None => String::new(),
                    Some(value) => match value.as_text() {
                        Some(text) => text,
                        None => {
                            tracing::warn!(
                                field = field.source(),
                                "Field value has no text representation, substituting empty string"
                            );
                            String::new()
                        }
                    },
                };
                let value = clamp_width(value, field.width());
                (field.column().to_string(), value)
            })
            .collect()
    }
}

/// Truncate a field name to the DBF limit
fn truncate_name(name: &str) -> &str {
    if name.len() <= MAX_FIELD_NAME_LEN {
        return name;
    }
    // Cut at a char boundary at or below the limit
    let mut cut = MAX_FIELD_NAME_LEN;
    while cut > 0 && !name.is_char_boundary(cut) {
        cut -= 1;
    }
    &name[..cut]
}

/// Clamp a value to the declared column width
fn clamp_width(mut value: String, width: u8) -> String {
    let width = width as usize;
    if value.len() > width {
        // Cut at a char boundary at or below the width
        let mut cut = width;
        while cut > 0 && !value.is_char_boundary(cut) {
            cut -= 1;
        }
        value.truncate(cut);
    }
    value
}
