use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionClient;
use crate::resumes::registry::MasterRegistry;
use crate::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres when `DATABASE_URL` is set, otherwise the in-process store.
    pub store: Arc<dyn ResumeStore>,
    /// Owns the master-assignment lock; shares `store` with the handlers.
    pub registry: Arc<MasterRegistry>,
    pub llm: Arc<dyn CompletionClient>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn ResumeStore>, llm: Arc<dyn CompletionClient>, config: Config) -> Self {
        Self {
            registry: Arc::new(MasterRegistry::new(store.clone())),
            store,
            llm,
            config,
        }
    }

    /// The request's language, or the configured default.
    pub fn language<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.config.default_language)
    }
}
