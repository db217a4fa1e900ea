//! labreq-api
//!
//! HTTP surface for the requisition form: schema and per-step validation
//! are public, everything touching stored records requires a bearer token.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use labreq_storage::store::DocumentStore;
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

pub fn router<S: DocumentStore + 'static>(state: AppState<S>) -> Router {
    use routes::requisitions as req;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route(
            "/requisitions",
            get(req::list_requisitions::<S>).post(req::create_requisition::<S>),
        )
        .route(
            "/requisitions/{id}",
            get(req::get_requisition::<S>)
                .put(req::update_requisition::<S>)
                .delete(req::delete_requisition::<S>),
        )
        .route("/requisitions/{id}/pdf", get(req::requisition_pdf::<S>))
        .route(
            "/requisitions/{id}/summary",
            get(req::requisition_summary::<S>),
        )
        .route_layer(axum_mw::from_fn_with_state(
            Arc::clone(&state.verifier),
            middleware::auth::require_auth,
        ));

    Router::new()
        // Public (no auth)
        .route("/health", get(routes::health::health_check))
        .route("/schema", get(routes::schema::form_schema))
        .route("/steps/{step}/validate", post(routes::steps::validate))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
