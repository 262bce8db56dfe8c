//! Submission pipeline
//!
//! The single entry point over the staged workflow:
//! parse → assemble → associate → gate → store → build → compose → send.
//!
//! Only the structural gate short-circuits, and it runs before any
//! external call. Every other failure accumulates as a warning on an
//! accepted outcome, so the caller either gets a full report of what
//! partially failed or an upfront rejection, never a mid-flight abort
//! that loses collected state.

use std::time::Duration;

use tradein_core::{Accepted, AppError, Config, Warning};
use tradein_storage::Storage;

use crate::assemble::assemble_items;
use crate::fields::parse_form;
use crate::form::{RawForm, UploadedFile};
use crate::notify::{compose, RenderedMessage};
use crate::photos::{associate_files, store_photos};
use crate::submission::{build_submission, is_structurally_empty};
use crate::transport::MailTransport;

/// Pipeline knobs, derived from the application config.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub upload_concurrency: usize,
    pub upload_timeout: Duration,
    pub send_timeout: Duration,
    /// Store-facing notification recipient. `None` disables dispatch
    /// (messages are still composed, useful in development).
    pub store_recipient: Option<String>,
}

impl IntakeConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            upload_concurrency: config.upload_concurrency(),
            upload_timeout: Duration::from_secs(config.upload_timeout_secs()),
            send_timeout: Duration::from_secs(config.send_timeout_secs()),
            store_recipient: config.store_notify_to().map(String::from),
        }
    }
}

/// Handle one form submission end to end.
///
/// Returns `Accepted` (submission plus accumulated warnings) or the
/// structural rejection. Storage and transport are injected collaborator
/// handles; `mailer` may be absent when SMTP is not configured, in which
/// case sends are skipped without warnings.
pub async fn handle_submission(
    form: RawForm,
    files: Vec<UploadedFile>,
    storage: &dyn Storage,
    mailer: Option<&dyn MailTransport>,
    config: &IntakeConfig,
) -> Result<Accepted, AppError> {
    let parsed = parse_form(&form);
    let mut warnings = parsed.warnings;
    let mut items = assemble_items(parsed.item_attrs);

    tracing::debug!(
        field_count = form.len(),
        file_count = files.len(),
        item_count = items.len(),
        "Parsed submission"
    );

    // Pure association first: photo-only indices materialize records, so
    // the structural gate sees the complete item list before any storage
    // or transport call happens.
    let jobs = associate_files(&mut items, files, &mut warnings);

    if is_structurally_empty(&parsed.scalar, &items) {
        return Err(AppError::EmptySubmission(
            "Nothing to submit: no contact details and no items".to_string(),
        ));
    }

    store_photos(
        &mut items,
        jobs,
        storage,
        config.upload_concurrency,
        config.upload_timeout,
        &mut warnings,
    )
    .await;

    let submission = build_submission(parsed.scalar, items)?;

    if let (Some(mailer), Some(store_recipient)) = (mailer, config.store_recipient.as_deref()) {
        let notification = compose(&submission, store_recipient);

        // The two sends are isolated: failure of one must not prevent
        // attempting the other.
        send_message(
            mailer,
            &notification.store,
            "store",
            config.send_timeout,
            &mut warnings,
        )
        .await;

        if let Some(customer) = &notification.customer {
            send_message(mailer, customer, "customer", config.send_timeout, &mut warnings).await;
        }
    } else {
        tracing::debug!("Mail transport not configured, skipping notification dispatch");
    }

    tracing::info!(
        item_count = submission.items.len(),
        photo_count = submission.photo_count(),
        warning_count = warnings.len(),
        "Submission accepted"
    );

    Ok(Accepted {
        submission,
        warnings,
    })
}

async fn send_message(
    mailer: &dyn MailTransport,
    message: &RenderedMessage,
    recipient: &str,
    timeout: Duration,
    warnings: &mut Vec<Warning>,
) {
    let outcome = tokio::time::timeout(
        timeout,
        mailer.send(&message.to, &message.subject, &message.body),
    )
    .await;

    let detail = match outcome {
        Ok(Ok(())) => {
            tracing::info!(recipient, to = %message.to, "Notification sent");
            return;
        }
        Ok(Err(e)) => e.to_string(),
        Err(_) => format!("timed out after {}s", timeout.as_secs()),
    };

    tracing::warn!(recipient, to = %message.to, error = %detail, "Notification send failed");
    warnings.push(Warning::TransportFailed {
        recipient: recipient.to_string(),
        detail,
    });
}
