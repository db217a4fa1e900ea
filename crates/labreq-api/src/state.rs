use std::sync::Arc;

use labreq_auth::jwt::TokenVerifier;
use labreq_storage::repository::RequisitionRepository;

/// Shared application state, injected into all route handlers via Axum state.
pub struct AppState<S> {
    pub repository: Arc<RequisitionRepository<S>>,
    pub verifier: Arc<TokenVerifier>,
}

impl<S> AppState<S> {
    pub fn new(repository: RequisitionRepository<S>, verifier: TokenVerifier) -> Self {
        Self {
            repository: Arc::new(repository),
            verifier: Arc::new(verifier),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            verifier: Arc::clone(&self.verifier),
        }
    }
}
