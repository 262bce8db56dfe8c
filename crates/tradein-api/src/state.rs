//! Application state
//!
//! One state object shared by all handlers: configuration plus the two
//! injected collaborator handles. Fakes slot in through the trait objects
//! in tests.

use std::sync::Arc;

use tradein_core::Config;
use tradein_intake::{IntakeConfig, MailTransport};
use tradein_storage::Storage;

pub struct AppState {
    pub config: Config,
    pub intake: IntakeConfig,
    pub storage: Arc<dyn Storage>,
    /// Absent when SMTP is not configured; the pipeline then skips sends.
    pub mailer: Option<Arc<dyn MailTransport>>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        mailer: Option<Arc<dyn MailTransport>>,
    ) -> Self {
        let intake = IntakeConfig::from_config(&config);
        Self {
            config,
            intake,
            storage,
            mailer,
        }
    }
}
