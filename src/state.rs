use crate::{config::Config, mailer::Mailer, service::SubmissionService};

use std::sync::Arc;

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub config: Config,
    pub service: SubmissionService,
}

impl AppState {
    pub fn new(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let service = SubmissionService::new(&config, mailer);
        Self { config, service }
    }
}
