use std::sync::Arc;

use axum::extract::FromRef;

use crate::catalog::VideoCatalog;
use crate::config::Settings;
use crate::session::SessionRegistry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub catalog: Arc<VideoCatalog>,
    pub registry: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let catalog = Arc::new(VideoCatalog::new(settings.catalog.path.clone()));
        Self {
            settings,
            catalog,
            registry: Arc::new(SessionRegistry::new()),
        }
    }
}

impl FromRef<AppState> for Arc<VideoCatalog> {
    fn from_ref(state: &AppState) -> Self {
        state.catalog.clone()
    }
}

impl FromRef<AppState> for Arc<SessionRegistry> {
    fn from_ref(state: &AppState) -> Self {
        state.registry.clone()
    }
}
