use std::sync::Arc;

use medcamp_auth::provider::IdentityProvider;
use medcamp_auth::session::SessionManager;
use medcamp_lifecycle::engine::Lifecycle;
use medcamp_storage::store::DocumentStore;

/// Identity providers usable behind the router.
pub trait Provider: IdentityProvider + 'static {}
impl<T: IdentityProvider + 'static> Provider for T {}

/// Document stores usable behind the router.
pub trait Store: DocumentStore + 'static {}
impl<T: DocumentStore + 'static> Store for T {}

/// Shared application state, injected into all route handlers via Axum state.
pub struct AppState<P, S> {
    pub sessions: Arc<SessionManager<P, S>>,
    pub lifecycle: Lifecycle<S>,
}

impl<P, S> Clone for AppState<P, S> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<P: Provider, S: Store> AppState<P, S> {
    /// Session manager and engine share one store.
    pub fn new(sessions: SessionManager<P, S>, lifecycle: Lifecycle<S>) -> Self {
        Self {
            sessions: Arc::new(sessions),
            lifecycle,
        }
    }
}
