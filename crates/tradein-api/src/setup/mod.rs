//! Application initialization

pub mod routes;
pub mod server;

use std::sync::Arc;

use axum::Router;
use tradein_core::Config;
use tradein_intake::MailTransport;

use crate::services::email::SmtpMailer;
use crate::state::AppState;

/// Wire up storage, mailer, state, and routes.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    let storage = tradein_storage::create_storage(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    let mailer: Option<Arc<dyn MailTransport>> = match SmtpMailer::from_config(&config) {
        Some(mailer) => Some(Arc::new(mailer)),
        None => {
            tracing::warn!("SMTP not configured, notifications will not be sent");
            None
        }
    };

    let state = Arc::new(AppState::new(config.clone(), storage, mailer));
    let router = routes::build_router(&config, state.clone())?;

    Ok((state, router))
}
