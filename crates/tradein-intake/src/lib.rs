//! Trade-In Intake Library
//!
//! This crate implements the submission decoding and association pipeline:
//! it takes a flat multipart payload (named text fields plus uploaded-file
//! descriptors) and deterministically reconstructs a typed list of item
//! records with their associated photos, tolerant of missing or malformed
//! input.
//!
//! Stages, leaf to root:
//!
//! 1. [`fields`] — scalar extraction and indexed-field / JSON-blob parsing
//! 2. [`assemble`] — attribute bags merged into ordered item records
//! 3. [`photos`] — file-to-item association and bounded-concurrency storage
//! 4. [`submission`] — the one structural validation gate
//! 5. [`notify`] — deterministic message rendering
//!
//! [`pipeline::handle_submission`] is the single entry point; storage and
//! mail collaborators are injected so tests can substitute fakes.

pub mod assemble;
pub mod fields;
pub mod form;
pub mod notify;
pub mod photos;
pub mod pipeline;
pub mod submission;
pub mod transport;

// Re-export commonly used types
pub use form::{RawForm, UploadedFile};
pub use pipeline::{handle_submission, IntakeConfig};
pub use transport::{MailTransport, TransportError};
