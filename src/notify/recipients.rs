//! Notification recipient resolution
//!
//! The recipient set is the union of the ordering user and the staff
//! subscribed to the ordered products' satellites. Configured fallback
//! recipients only apply when that union is empty; the support address is
//! always present. Users without an email address are skipped with a
//! warning, never silently mailed to an empty string.

use crate::config::EmailConfig;
use crate::domain::catalogue::{GenericProduct, ProductSubscription, User};
use std::collections::BTreeSet;

/// Resolve the addresses an order notification goes to
pub fn resolve_recipients(
    acting_user: Option<&User>,
    products: &[GenericProduct],
    subscriptions: &[ProductSubscription],
    email: &EmailConfig,
) -> BTreeSet<String> {
    let mut recipients = BTreeSet::new();

    if let Some(user) = acting_user {
        add_user(&mut recipients, user);
    }
    for product in products {
        for subscriber in ProductSubscription::users_for_product(subscriptions, product) {
            add_user(&mut recipients, subscriber);
        }
    }

    if recipients.is_empty() {
        recipients.extend(email.default_recipients.iter().cloned());
    }
    recipients.insert(email.support_address.clone());
    recipients
}

fn add_user(recipients: &mut BTreeSet<String>, user: &User) {
    if user.email.is_empty() {
        tracing::warn!(username = %user.username, "User has no email address, skipping");
    } else {
        recipients.insert(user.email.clone());
    }
}
