use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use labreq_auth::error::AuthError;
use labreq_auth::jwt::{TokenVerifier, bearer_token};

use crate::error::ApiError;

pub use labreq_auth::jwt::AuthUser;

/// JWT validation middleware.
///
/// Verifies the `Authorization: Bearer <token>` header and inserts the
/// resulting [`AuthUser`] into request extensions for handlers to use.
pub async fn require_auth(
    State(verifier): State<Arc<TokenVerifier>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;
        verifier.verify(bearer_token(header)?)?
    };

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
