use axum::Json;
use axum::extract::Path;
use labreq_core::models::requisition::Requisition;
use labreq_form::steps::Step;
use labreq_form::validate::{ValidationError, validate_step};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct StepValidation {
    step: Step,
    valid: bool,
    errors: Vec<ValidationError>,
}

/// Run one step's validator against a record. Never persists anything.
pub async fn validate(Path(step): Path<Step>, Json(body): Json<Value>) -> Json<StepValidation> {
    let record = Requisition::from_value(&body);
    let errors = validate_step(step, &record);
    Json(StepValidation {
        step,
        valid: errors.is_empty(),
        errors,
    })
}
