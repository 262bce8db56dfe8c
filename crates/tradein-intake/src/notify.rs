//! Notification Composer
//!
//! Renders a submission into presentational payloads for the mail
//! transport: a store-facing message enumerating every field and item,
//! and a short customer confirmation when an email address was given.
//! Rendering is deterministic given the submission, so tests can compare
//! against golden output. Nothing is sent from here.

use std::fmt::Write as _;

use tradein_core::{ItemRecord, Submission};

/// One message ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Messages composed from one submission.
#[derive(Debug, Clone)]
pub struct Notification {
    pub store: RenderedMessage,
    /// Present only when the customer left an email address.
    pub customer: Option<RenderedMessage>,
}

/// Render the store notification and, when possible, the customer
/// confirmation.
pub fn compose(submission: &Submission, store_recipient: &str) -> Notification {
    let display_name = if submission.customer.customer_name.is_empty() {
        "(no name)"
    } else {
        &submission.customer.customer_name
    };

    let store = RenderedMessage {
        to: store_recipient.to_string(),
        subject: format!(
            "New sell request from {} ({} item(s))",
            display_name,
            submission.items.len()
        ),
        body: render_store_body(submission),
    };

    let customer = if submission.customer.customer_email.is_empty() {
        None
    } else {
        Some(RenderedMessage {
            to: submission.customer.customer_email.clone(),
            subject: "We received your sell request".to_string(),
            body: render_customer_body(submission, display_name),
        })
    };

    Notification { store, customer }
}

fn render_store_body(submission: &Submission) -> String {
    let c = &submission.customer;
    let mut body = String::new();

    body.push_str("New sell-to-us submission\n\n");
    let _ = writeln!(body, "Name:      {}", c.customer_name);
    let _ = writeln!(body, "Phone:     {}", c.customer_phone);
    let _ = writeln!(body, "Email:     {}", c.customer_email);
    let _ = writeln!(body, "Instagram: {}", c.customer_instagram);
    let _ = writeln!(body, "Location:  {}", c.customer_location);
    let _ = writeln!(body, "Drop-off:  {}", c.dropoff_method);
    let _ = writeln!(body, "Payment:   {}", c.payment_methods.join(", "));

    if submission.items.is_empty() {
        body.push_str("\nNo items listed.\n");
    }

    for item in &submission.items {
        body.push('\n');
        render_item_block(&mut body, item);
    }

    body
}

fn render_item_block(body: &mut String, item: &ItemRecord) {
    let _ = writeln!(body, "Item {}", item.index);
    let _ = writeln!(body, "  Brand/model: {}", item.brand_model);
    let _ = writeln!(body, "  Size:        {}", item.size);
    let _ = writeln!(body, "  Condition:   {}", item.condition);
    let _ = writeln!(body, "  Asking:      {}", item.desired_price);
    let _ = writeln!(body, "  Box:         {}", item.has_box);
    let _ = writeln!(body, "  Notes:       {}", item.notes);

    if item.photos.is_empty() {
        body.push_str("  Photos:      none\n");
        return;
    }

    body.push_str("  Photos:\n");
    for (n, photo) in item.photos.iter().enumerate() {
        match &photo.resolved_url {
            Some(url) => {
                let _ = writeln!(body, "    {}. {}", n + 1, url);
            }
            None => {
                let _ = writeln!(
                    body,
                    "    {}. (photo failed to upload: {})",
                    n + 1,
                    photo.original_filename
                );
            }
        }
    }
}

fn render_customer_body(submission: &Submission, display_name: &str) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "Hi {},", display_name);
    body.push('\n');
    let _ = writeln!(
        body,
        "Thanks for your sell request. We received {} item(s) and {} photo(s).",
        submission.items.len(),
        submission.photo_count()
    );
    body.push_str("We will review everything and get back to you shortly.\n");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradein_core::{PhotoRef, ScalarFields};

    fn sample_submission() -> Submission {
        Submission {
            customer: ScalarFields {
                customer_name: "Jordan Lee".to_string(),
                customer_phone: "555-0100".to_string(),
                customer_email: "jordan@example.com".to_string(),
                customer_instagram: "@jlee".to_string(),
                customer_location: "Austin".to_string(),
                dropoff_method: "ship".to_string(),
                payment_methods: vec!["cash".to_string(), "store_credit".to_string()],
            },
            items: vec![
                ItemRecord {
                    index: 0,
                    brand_model: "Air Max 95".to_string(),
                    size: "10.5".to_string(),
                    condition: "worn".to_string(),
                    desired_price: "80".to_string(),
                    has_box: "no".to_string(),
                    notes: "small scuff".to_string(),
                    photos: vec![],
                },
                ItemRecord {
                    index: 2,
                    brand_model: "Dunk Low".to_string(),
                    size: "9".to_string(),
                    condition: "new".to_string(),
                    desired_price: "150".to_string(),
                    has_box: "yes".to_string(),
                    notes: "og all".to_string(),
                    photos: vec![
                        PhotoRef {
                            original_filename: "dunk_side.jpg".to_string(),
                            content_type: "image/jpeg".to_string(),
                            resolved_url: Some(
                                "http://assets.test/photos/ab.jpg".to_string(),
                            ),
                        },
                        PhotoRef {
                            original_filename: "dunk_sole.jpg".to_string(),
                            content_type: "image/jpeg".to_string(),
                            resolved_url: None,
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn store_message_golden_body() {
        let notification = compose(&sample_submission(), "buy@96kickz.test");

        assert_eq!(notification.store.to, "buy@96kickz.test");
        assert_eq!(
            notification.store.subject,
            "New sell request from Jordan Lee (2 item(s))"
        );

        let expected = "\
New sell-to-us submission

Name:      Jordan Lee
Phone:     555-0100
Email:     jordan@example.com
Instagram: @jlee
Location:  Austin
Drop-off:  ship
Payment:   cash, store_credit

Item 0
  Brand/model: Air Max 95
  Size:        10.5
  Condition:   worn
  Asking:      80
  Box:         no
  Notes:       small scuff
  Photos:      none

Item 2
  Brand/model: Dunk Low
  Size:        9
  Condition:   new
  Asking:      150
  Box:         yes
  Notes:       og all
  Photos:
    1. http://assets.test/photos/ab.jpg
    2. (photo failed to upload: dunk_sole.jpg)
";
        assert_eq!(notification.store.body, expected);
    }

    #[test]
    fn rendering_is_deterministic() {
        let submission = sample_submission();
        let first = compose(&submission, "buy@96kickz.test");
        let second = compose(&submission, "buy@96kickz.test");
        assert_eq!(first.store, second.store);
        assert_eq!(first.customer, second.customer);
    }

    #[test]
    fn customer_confirmation_requires_email() {
        let mut submission = sample_submission();
        let notification = compose(&submission, "buy@96kickz.test");
        let customer = notification.customer.expect("email present");
        assert_eq!(customer.to, "jordan@example.com");
        assert!(customer.body.contains("2 item(s) and 2 photo(s)"));

        submission.customer.customer_email.clear();
        let notification = compose(&submission, "buy@96kickz.test");
        assert!(notification.customer.is_none());
    }

    #[test]
    fn missing_name_renders_placeholder() {
        let mut submission = sample_submission();
        submission.customer.customer_name.clear();
        let notification = compose(&submission, "buy@96kickz.test");
        assert!(notification.store.subject.starts_with("New sell request from (no name)"));
    }
}
