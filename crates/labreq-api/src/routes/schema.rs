use axum::Json;
use labreq_core::schema::{SECTIONS, SectionId, SectionSchema};
use labreq_form::steps::Step;
use serde::Serialize;

/// The whole form definition, for clients that render it.
#[derive(Serialize)]
pub struct FormSchema {
    sections: &'static [SectionSchema],
    steps: Vec<StepSchema>,
}

#[derive(Serialize)]
pub struct StepSchema {
    id: Step,
    title: &'static str,
    sections: &'static [SectionId],
}

pub async fn form_schema() -> Json<FormSchema> {
    let steps = Step::ALL
        .into_iter()
        .map(|step| StepSchema {
            id: step,
            title: step.title(),
            sections: step.sections(),
        })
        .collect();

    Json(FormSchema {
        sections: &SECTIONS,
        steps,
    })
}
