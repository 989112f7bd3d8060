//! Domain models and types for the catalogue export subsystem.
//!
//! The domain layer provides:
//! - **Catalogue models** ([`GenericProduct`], [`SearchRecord`], [`Order`],
//!   [`TaskingRequest`], [`User`], [`ProductSubscription`])
//! - **Flat export records** ([`Record`], [`ScalarValue`])
//! - **Error types** ([`CatalogueError`]) and the [`Result`] alias
//!
//! Catalogue models are plain serde structs; exporters only ever consume the
//! flattened [`Record`] form produced by their `to_record` projections.

pub mod catalogue;
pub mod errors;
pub mod record;
pub mod result;

pub use catalogue::{
    DeliveryDetail, GenericProduct, Order, OrderStatusHistory, ProductSubscription, SearchRecord,
    TaskingRequest, User, CATALOGUE_SRID,
};
pub use errors::CatalogueError;
pub use record::{Record, ScalarValue};
pub use result::Result;
