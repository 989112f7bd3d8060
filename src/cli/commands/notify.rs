//! Notify command implementation
//!
//! Reads an order, its status history, and the subscription context from a
//! JSON document and runs one notification delivery.

use crate::config::load_config;
use crate::domain::catalogue::{GenericProduct, Order, OrderStatusHistory, ProductSubscription};
use crate::notify::Notifier;
use clap::Args;
use serde::Deserialize;
use std::path::PathBuf;

/// Notification context read from the input document
#[derive(Deserialize, Debug)]
pub struct NotifyInput {
    pub order: Order,
    #[serde(default)]
    pub history: Vec<OrderStatusHistory>,
    #[serde(default)]
    pub products: Vec<GenericProduct>,
    #[serde(default)]
    pub subscriptions: Vec<ProductSubscription>,
}

/// Arguments for the notify command
#[derive(Args, Debug)]
pub struct NotifyArgs {
    /// JSON document holding the order and its notification context
    #[arg(short, long)]
    pub input: PathBuf,
}

impl NotifyArgs {
    /// Execute the notify command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting notification run");

        let config = load_config(config_path)?;
        let raw = std::fs::read_to_string(&self.input)?;
        let input: NotifyInput = serde_json::from_str(&raw)?;

        let notifier = Notifier::new(&config);
        let sent = notifier.notify_order_status(
            &input.order,
            &input.history,
            &input.products,
            &input.subscriptions,
        )?;

        if sent == 0 && config.email.notifications_enabled {
            println!("⚠️  No notifications were delivered for order {}", input.order.id);
            return Ok(3);
        }
        println!(
            "✅ Order {} notification sent to {} recipient(s)",
            input.order.id, sent
        );
        Ok(0)
    }
}
