use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::{Value, json};
use uuid::Uuid;

use labreq_audit::events::AuditEvent;
use labreq_core::models::requisition::Requisition;
use labreq_core::models::stored::{RequisitionUpdate, StoredRequisition};
use labreq_form::controller::FormController;
use labreq_storage::store::DocumentStore;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub async fn list_requisitions<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<StoredRequisition>>, ApiError> {
    Ok(Json(state.repository.list(&user.uid).await?))
}

/// Validate every step and store the record as a new draft.
pub async fn create_requisition<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<StoredRequisition>), ApiError> {
    let mut form = FormController::new(&state.repository, Some(user.uid));
    form.load(Requisition::from_value(&body));
    let stored = form.submit().await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn get_requisition<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredRequisition>, ApiError> {
    Ok(Json(owned(&state, id, &user).await?))
}

/// Merge a partial update. Drafts may be incomplete, so nothing is validated.
pub async fn update_requisition<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(update): Json<RequisitionUpdate>,
) -> Result<Json<StoredRequisition>, ApiError> {
    owned(&state, id, &user).await?;
    Ok(Json(state.repository.update(id, update).await?))
}

pub async fn delete_requisition<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    owned(&state, id, &user).await?;
    state.repository.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn requisition_pdf<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = owned(&state, id, &user).await?;

    let rendered =
        tokio::task::spawn_blocking(move || labreq_export::render_document(&record)).await??;

    AuditEvent::requisition("requisition.exported", id, &user.uid)
        .with_details(json!({ "filename": rendered.filename, "bytes": rendered.bytes.len() }))
        .emit();
    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", rendered.filename),
            ),
        ],
        rendered.bytes,
    ))
}

pub async fn requisition_summary<S: DocumentStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = owned(&state, id, &user).await?;
    let text = labreq_export::summary::render_summary(&record)?;
    Ok(([(CONTENT_TYPE, "text/plain; charset=utf-8")], text))
}

/// Load a record the caller owns. Someone else's record looks absent.
async fn owned<S: DocumentStore>(
    state: &AppState<S>,
    id: Uuid,
    user: &AuthUser,
) -> Result<StoredRequisition, ApiError> {
    state
        .repository
        .get(id)
        .await?
        .filter(|record| record.user_id == user.uid)
        .ok_or_else(ApiError::requisition_not_found)
}
