//! Auth state shared with handlers and extractors.

use std::sync::Arc;

use chirp_auth::SessionManager;

/// Auth dependencies an application state must expose.
///
/// Extractors obtain it through `FromRef`, so any router state that
/// implements `FromRef<S> for AuthState` can use them.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// Session lifecycle manager.
    pub sessions: Arc<SessionManager>,
}

impl AuthState {
    /// Wraps a session manager.
    pub fn new(sessions: SessionManager) -> Self {
        Self {
            sessions: Arc::new(sessions),
        }
    }
}
