//! Mail transport seam
//!
//! The pipeline only ever talks to this trait; the SMTP implementation
//! lives in the API crate and tests substitute fakes.

use async_trait::async_trait;
use thiserror::Error;

/// Transport operation errors
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("send failed: {0}")]
    SendFailed(String),
}

/// One-shot plain-text mail delivery. Each call may fail independently;
/// the pipeline never retries.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError>;
}
