use std::sync::Arc;

use crate::chat::store::SessionStore;
use crate::chat::Assistant;
use crate::config::Config;
use crate::features::FeatureFacade;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub facade: FeatureFacade,
    /// Reply source for chat sessions. Default: the façade's chat webhook.
    pub assistant: Arc<dyn Assistant>,
    pub sessions: SessionStore,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, facade: FeatureFacade) -> Self {
        Self {
            assistant: Arc::new(facade.clone()),
            facade,
            sessions: SessionStore::new(config.session_idle_ttl, config.max_chat_sessions),
            config,
        }
    }
}
