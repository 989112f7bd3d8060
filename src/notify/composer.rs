//! Order notification composition and delivery
//!
//! One notification run renders the text and HTML bodies, attaches the
//! header image inline and the order summary PDF, and sends one message per
//! resolved recipient over blocking SMTP. An unreachable relay fails the
//! run before anything is sent; a per-recipient send failure is logged and
//! the remaining recipients still get their copy.

use crate::config::CatalogueConfig;
use crate::domain::catalogue::{GenericProduct, Order, OrderStatusHistory, ProductSubscription};
use crate::domain::errors::CatalogueError;
use crate::domain::result::Result;
use crate::notify::pdf::order_summary_pdf;
use crate::notify::recipients::resolve_recipients;
use crate::notify::related::{build_related_message, InlinePart};
use askama::Template;
use lettre::{SmtpTransport, Transport};
use std::path::Path;

struct HistoryLine {
    changed_at: String,
    old_status: String,
    new_status: String,
}

struct OrderView {
    acronym: String,
    order_id: u64,
    username: String,
    status: String,
    order_date: String,
    notes: String,
    delivery_method: String,
    history: Vec<HistoryLine>,
}

impl OrderView {
    fn new(acronym: &str, order: &Order, history: &[OrderStatusHistory]) -> Self {
        Self {
            acronym: acronym.to_string(),
            order_id: order.id,
            username: order.user.username.clone(),
            status: order.status.clone(),
            order_date: order.order_date.format("%Y-%m-%d %H:%M").to_string(),
            notes: order.notes.clone(),
            delivery_method: order.delivery_detail.delivery_method.clone(),
            history: history
                .iter()
                .map(|entry| HistoryLine {
                    changed_at: entry.changed_at.format("%Y-%m-%d %H:%M").to_string(),
                    old_status: entry.old_status.clone(),
                    new_status: entry.new_status.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "order.txt")]
struct OrderText<'a> {
    view: &'a OrderView,
}

#[derive(Template)]
#[template(path = "order.html")]
struct OrderHtml<'a> {
    view: &'a OrderView,
}

/// Composes and delivers order status notifications
pub struct Notifier<'a> {
    config: &'a CatalogueConfig,
}

impl<'a> Notifier<'a> {
    pub fn new(config: &'a CatalogueConfig) -> Self {
        Self { config }
    }

    /// The `dontreply@<domain>` sender address
    pub fn sender(&self) -> String {
        format!("dontreply@{}", self.config.organisation.domain)
    }

    /// Subject line for an order status notification
    pub fn subject(&self, order: &Order) -> String {
        format!(
            "{} Order {} status update ({})",
            self.config.organisation.acronym, order.id, order.status
        )
    }

    /// Notify everyone interested in the order's status change.
    ///
    /// Returns the number of messages delivered; zero when notifications
    /// are disabled.
    ///
    /// # Errors
    ///
    /// Template rendering, PDF generation, and an unreachable SMTP relay
    /// are fatal. Per-recipient send failures are logged and skipped.
    pub fn notify_order_status(
        &self,
        order: &Order,
        history: &[OrderStatusHistory],
        products: &[GenericProduct],
        subscriptions: &[ProductSubscription],
    ) -> Result<usize> {
        if !self.config.email.notifications_enabled {
            tracing::info!(order_id = order.id, "Email notifications disabled, skipping");
            return Ok(0);
        }

        let recipients = resolve_recipients(
            Some(&order.user),
            products,
            subscriptions,
            &self.config.email,
        );
        let view = OrderView::new(&self.config.organisation.acronym, order, history);
        let text = OrderText { view: &view }
            .render()
            .map_err(|e| CatalogueError::Template(format!("Text body render failed: {e}")))?;
        let html = OrderHtml { view: &view }
            .render()
            .map_err(|e| CatalogueError::Template(format!("HTML body render failed: {e}")))?;

        let inline = self.header_image();
        let pdf_name = format!("order-{}.pdf", order.id);
        let pdf = order_summary_pdf(order, history)?;

        let transport = self.transport()?;
        let sender = self.sender();
        let subject = self.subject(order);

        let mut sent = 0;
        for recipient in &recipients {
            let message = build_related_message(
                &sender,
                recipient,
                &subject,
                text.clone(),
                html.clone(),
                &inline,
                Some((&pdf_name, pdf.clone())),
            )?;
            match transport.send(&message) {
                Ok(_) => sent += 1,
                Err(e) => {
                    tracing::warn!(recipient = %recipient, error = %e, "Notification not delivered");
                }
            }
        }

        tracing::info!(
            order_id = order.id,
            recipients = recipients.len(),
            sent,
            "Order notification run complete"
        );
        Ok(sent)
    }

    /// The inline header image, when present on disk
    fn header_image(&self) -> Vec<InlinePart> {
        let path = Path::new(&self.config.email.header_image);
        match InlinePart::from_file(path) {
            Ok(part) => vec![part],
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Header image not attached");
                Vec::new()
            }
        }
    }

    fn transport(&self) -> Result<SmtpTransport> {
        let transport = SmtpTransport::builder_dangerous(&self.config.email.smtp_host)
            .port(self.config.email.smtp_port)
            .build();
        match transport.test_connection() {
            Ok(true) => Ok(transport),
            Ok(false) => Err(CatalogueError::Notification(format!(
                "SMTP relay {}:{} refused the connection test",
                self.config.email.smtp_host, self.config.email.smtp_port
            ))),
            Err(e) => Err(CatalogueError::Notification(format!(
                "SMTP relay {}:{} is unreachable: {e}",
                self.config.email.smtp_host, self.config.email.smtp_port
            ))),
        }
    }
}
