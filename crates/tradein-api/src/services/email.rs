//! SMTP mail transport for notification dispatch.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::info;

use tradein_core::Config;
use tradein_intake::{MailTransport, TransportError};

/// SMTP-backed implementation of the pipeline's mail transport seam.
/// No-op at startup when SMTP is not configured: `from_config` returns
/// `None` and the pipeline skips sends.
#[derive(Clone)]
pub struct SmtpMailer {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl SmtpMailer {
    /// Create the mailer from config. Returns `None` if SMTP host or the
    /// sender address is missing.
    pub fn from_config(config: &Config) -> Option<Self> {
        let host = config.smtp_host()?;
        let from = config.smtp_from()?.to_string();
        let port = config.smtp_port().unwrap_or(587);

        let mailer = if config.smtp_tls() {
            let b = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).ok()?;
            let b = b.port(port);
            let b = if let (Some(u), Some(p)) = (config.smtp_user(), config.smtp_password()) {
                b.credentials(Credentials::new(u.to_string(), p.to_string()))
            } else {
                b
            };
            tracing::info!(
                host = %host,
                port = port,
                "Mailer initialized (SMTP with STARTTLS)"
            );
            b.build()
        } else {
            let b = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            let b = if let (Some(u), Some(p)) = (config.smtp_user(), config.smtp_password()) {
                b.credentials(Credentials::new(u.to_string(), p.to_string()))
            } else {
                b
            };
            tracing::info!(host = %host, port = port, "Mailer initialized (SMTP)");
            b.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), TransportError> {
        let to_addr: Mailbox = to
            .parse()
            .map_err(|e| TransportError::InvalidAddress(format!("'{}': {}", to, e)))?;
        let from_addr: Mailbox = self
            .from
            .parse()
            .map_err(|e| TransportError::InvalidAddress(format!("SMTP_FROM: {}", e)))?;

        let email = Message::builder()
            .from(from_addr)
            .to(to_addr)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;

        info!(to = %to, "Notification email sent");
        Ok(())
    }
}
