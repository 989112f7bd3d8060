//! Order summary PDF
//!
//! A single-page A4 summary attached to order notifications. Rendering is
//! deliberately plain: builtin Helvetica, one line per detail, the status
//! history listed oldest first.

use crate::domain::catalogue::{Order, OrderStatusHistory};
use crate::domain::errors::CatalogueError;
use crate::domain::result::Result;
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 8.0;

/// Render the order summary as PDF bytes
pub fn order_summary_pdf(order: &Order, history: &[OrderStatusHistory]) -> Result<Vec<u8>> {
    let (document, page, layer) = PdfDocument::new(
        format!("Order {}", order.id),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "summary",
    );
    let regular = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| CatalogueError::Notification(format!("Cannot load PDF font: {e}")))?;
    let bold = document
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| CatalogueError::Notification(format!("Cannot load PDF font: {e}")))?;

    let layer = document.get_page(page).get_layer(layer);
    let mut cursor = PAGE_HEIGHT_MM - MARGIN_MM;

    let heading = |text: &str, cursor: &mut f32| {
        layer.use_text(text, 16.0, Mm(MARGIN_MM), Mm(*cursor), &bold);
        *cursor -= LINE_HEIGHT_MM * 1.5;
    };
    let line = |text: &str, cursor: &mut f32| {
        layer.use_text(text, 11.0, Mm(MARGIN_MM), Mm(*cursor), &regular);
        *cursor -= LINE_HEIGHT_MM;
    };

    heading(&format!("Order {}", order.id), &mut cursor);
    line(&format!("User: {}", order.user.username), &mut cursor);
    line(
        &format!("Order date: {}", order.order_date.format("%Y-%m-%d %H:%M")),
        &mut cursor,
    );
    line(&format!("Status: {}", order.status), &mut cursor);
    line(
        &format!(
            "Delivery method: {}",
            order.delivery_detail.delivery_method
        ),
        &mut cursor,
    );
    if !order.notes.is_empty() {
        line(&format!("Notes: {}", order.notes), &mut cursor);
    }

    cursor -= LINE_HEIGHT_MM;
    heading("Status history", &mut cursor);
    for entry in history {
        line(
            &format!(
                "{}  {} -> {}",
                entry.changed_at.format("%Y-%m-%d %H:%M"),
                entry.old_status,
                entry.new_status
            ),
            &mut cursor,
        );
    }

    document
        .save_to_bytes()
        .map_err(|e| CatalogueError::Notification(format!("PDF serialisation failed: {e}")))
}
