//! Notification assembly tests
//!
//! Delivery needs a live SMTP relay, so these tests stop at the assembled
//! message and the resolved recipient set.

use eocat::config::EmailConfig;
use eocat::domain::catalogue::{ProductSubscription, User};
use eocat::notify::{build_related_message, resolve_recipients, InlinePart};

fn email_config() -> EmailConfig {
    EmailConfig {
        notifications_enabled: true,
        smtp_host: "localhost".to_string(),
        smtp_port: 25,
        support_address: "support@example.org".to_string(),
        default_recipients: Vec::new(),
        header_image: "images/header_email.jpg".to_string(),
    }
}

fn user(name: &str, email: &str) -> User {
    User {
        username: name.to_string(),
        email: email.to_string(),
    }
}

#[test]
fn test_recipient_set_without_context_is_support_only() {
    let recipients = resolve_recipients(None, &[], &[], &email_config());
    assert_eq!(
        recipients.into_iter().collect::<Vec<_>>(),
        vec!["support@example.org"]
    );
}

#[test]
fn test_subscribers_join_the_ordering_user() {
    let products = vec![product("S5-0001")];
    let subscriptions = vec![ProductSubscription {
        satellite: "ZASat-2".to_string(),
        recipients: vec![user("sales1", "sales1@example.org")],
    }];
    let recipients = resolve_recipients(
        Some(&user("alice", "alice@example.org")),
        &products,
        &subscriptions,
        &email_config(),
    );
    assert_eq!(recipients.len(), 3);
    assert!(recipients.contains("alice@example.org"));
    assert!(recipients.contains("sales1@example.org"));
    assert!(recipients.contains("support@example.org"));
}

#[test]
fn test_message_is_multipart_related_with_inline_image() {
    let inline = vec![InlinePart {
        file_name: "header_email.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xff, 0xd8, 0xff],
    }];
    let message = build_related_message(
        "dontreply@catalogue.example.org",
        "alice@example.org",
        "SANSA Order 7 status update (Completed)",
        "Your order status changed.".to_string(),
        r#"<p>Status changed</p><img src="header_email.jpg">"#.to_string(),
        &inline,
        Some(("order-7.pdf", b"%PDF-1.4".to_vec())),
    )
    .unwrap();

    let rendered = String::from_utf8(message.formatted()).unwrap();
    assert!(rendered.contains("Subject: SANSA Order 7 status update (Completed)"));
    assert!(rendered.contains("multipart/mixed"));
    assert!(rendered.contains("multipart/alternative"));
    assert!(rendered.contains("multipart/related"));
    assert!(rendered.contains("cid:header_email.jpg"));
    assert!(rendered.contains("application/pdf"));
}

fn product(id: &str) -> eocat::domain::catalogue::GenericProduct {
    use chrono::{TimeZone, Utc};
    eocat::domain::catalogue::GenericProduct {
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
        geometric_accuracy_mean: None,
        geometric_accuracy_1sigma: None,
        geometric_accuracy_2sigma: None,
        spectral_accuracy: None,
        radiometric_signal_to_noise_ratio: None,
        radiometric_percentage_error: None,
        spatial_resolution_x: None,
        spatial_resolution_y: None,
        spectral_resolution: None,
        radiometric_resolution: None,
        creating_software: "eocat".to_string(),
        original_product_id: None,
        orbit_number: None,
        product_revision: None,
        path: None,
        path_offset: None,
        row: None,
        row_offset: None,
        spatial_coverage: None,
    }
}
