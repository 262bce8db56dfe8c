//! Trade-In API Library
//!
//! This crate provides the HTTP handlers, SMTP mailer, and application
//! setup for the trade-in intake service.

mod handlers;

pub mod error;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

// Re-exports
pub use error::ErrorResponse;
pub use services::email::SmtpMailer;
pub use state::AppState;
