use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tradein_core::{AppError, Warning};
use tradein_intake::{handle_submission, RawForm, UploadedFile};

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub accepted: bool,
    pub message: String,
    pub item_count: usize,
    pub photo_count: usize,
    pub warnings: Vec<Warning>,
}

/// Sell-to-us form submission handler
///
/// Flattens the multipart payload into named text fields plus uploaded
/// files and delegates to the intake pipeline. Upload guard rails
/// (per-file size, file count) are enforced here, before any pipeline
/// work.
///
/// # Returns
/// `SubmitResponse` with item/photo counts and accumulated warnings on
/// success (HTTP 201 Created)
///
/// # Errors
/// - `AppError::EmptySubmission` - Nothing to submit
/// - `AppError::InvalidInput` - Unreadable multipart payload
/// - `AppError::PayloadTooLarge` - File exceeds size or count limit
#[tracing::instrument(skip(state, multipart), fields(operation = "submit"))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmitResponse>), HttpAppError> {
    let (form, files) = collect_multipart(
        multipart,
        state.config.max_file_size_bytes(),
        state.config.max_files_per_submission(),
    )
    .await?;

    tracing::debug!(
        field_count = form.len(),
        file_count = files.len(),
        "Received form submission"
    );

    let mailer = state.mailer.as_deref();
    let accepted = handle_submission(form, files, state.storage.as_ref(), mailer, &state.intake)
        .await
        .map_err(HttpAppError::from)?;

    let response = SubmitResponse {
        accepted: true,
        message: "Form received.".to_string(),
        item_count: accepted.submission.items.len(),
        photo_count: accepted.submission.photo_count(),
        warnings: accepted.warnings,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Flatten a multipart request into text fields and file descriptors.
/// Parts with a filename are files; everything else is a text field.
async fn collect_multipart(
    mut multipart: Multipart,
    max_file_size: usize,
    max_files: usize,
) -> Result<(RawForm, Vec<UploadedFile>), HttpAppError> {
    let mut form = RawForm::new();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if let Some(filename) = field.file_name().map(|s| s.to_string()) {
            if files.len() >= max_files {
                return Err(AppError::PayloadTooLarge(format!(
                    "Too many files: at most {} photos per submission",
                    max_files
                ))
                .into());
            }

            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            if data.len() > max_file_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "File '{}' exceeds maximum allowed size of {} MB",
                    filename,
                    max_file_size / 1024 / 1024
                ))
                .into());
            }

            files.push(UploadedFile {
                field_name,
                filename,
                content_type,
                data: data.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read field: {}", e)))?;
            form.insert(field_name, value);
        }
    }

    Ok((form, files))
}
