//! Order status notifications

pub mod composer;
pub mod pdf;
pub mod recipients;
pub mod related;

pub use composer::Notifier;
pub use recipients::resolve_recipients;
pub use related::{build_related_message, InlinePart};
