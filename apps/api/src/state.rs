use std::sync::Arc;

use crate::config::Config;
use crate::mail::Mailer;
use crate::upload::UploadStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; every request sends through this handle.
    pub mailer: Arc<dyn Mailer>,
    pub uploads: UploadStore,
    pub config: Config,
}
