use std::sync::Arc;

use crate::backend::Backend;

/// Shared across all actix workers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    /// Mark session cookies `Secure` (serve over HTTPS)
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, cookie_secure: bool) -> Self {
        AppState {
            backend,
            cookie_secure,
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }
}
