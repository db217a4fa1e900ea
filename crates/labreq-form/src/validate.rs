//! Step validators.
//!
//! Pure functions of the record. An empty list means the step is valid.
//! Text leaves that are empty or whitespace only count as missing.

use labreq_core::models::requisition::Requisition;
use labreq_core::schema::{SectionId, field};
use serde::Serialize;
use thiserror::Error;

use crate::steps::Step;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub step: Step,
    /// `section.leaf`, or just `section` for "select at least one" errors.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(step: Step, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            step,
            field: field.into(),
            message: message.into(),
        }
    }

    fn leaf(step: Step, section: SectionId, key: &str, message: impl Into<String>) -> Self {
        Self::new(step, format!("{}.{key}", section.key()), message)
    }
}

pub fn validate_step(step: Step, record: &Requisition) -> Vec<ValidationError> {
    match step {
        Step::PatientInfo => patient_info(record),
        Step::TherapeuticDrugs => selection(step, SectionId::TherapeuticDrugs, record),
        Step::Hematology => selection(step, SectionId::Hematology, record),
        Step::Chemistry => chemistry(record),
        Step::Lipids => selection(step, SectionId::Lipids, record),
        Step::Biochemistry => selection(step, SectionId::Biochemistry, record),
        Step::Prenatal => selection(step, SectionId::Prenatal, record),
        Step::UrineTests => urine(record),
        Step::Hepatitis => selection(step, SectionId::Hepatitis, record),
        Step::Microbiology => microbiology(record),
        Step::Review => Vec::new(),
    }
}

/// Every step's errors, in step order.
pub fn validate_all(record: &Requisition) -> Vec<ValidationError> {
    Step::ALL
        .into_iter()
        .flat_map(|step| validate_step(step, record))
        .collect()
}

fn patient_info(record: &Requisition) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for section in [SectionId::PatientInfo, SectionId::RequestingPhysician] {
        for f in section.schema().fields.iter().filter(|f| f.required) {
            if record.is_blank(section, f.key) {
                errors.push(ValidationError::leaf(
                    Step::PatientInfo,
                    section,
                    f.key,
                    format!("{} is required", f.label),
                ));
            }
        }
    }
    errors
}

fn selection(step: Step, section: SectionId, record: &Requisition) -> Vec<ValidationError> {
    if record.any_flag(section) {
        return Vec::new();
    }
    let noun = section.schema().selection_noun.unwrap_or("test");
    vec![ValidationError::new(
        step,
        section.key(),
        format!("Please select at least one {noun}"),
    )]
}

fn chemistry(record: &Requisition) -> Vec<ValidationError> {
    let section = SectionId::Chemistry;
    let mut errors = selection(Step::Chemistry, section, record);
    if record.flag(section, field::CRCLE) && record.is_blank(section, field::WEIGHT) {
        errors.push(ValidationError::leaf(
            Step::Chemistry,
            section,
            field::WEIGHT,
            "Weight is required when Creatinine Clearance is selected",
        ));
    }
    errors
}

fn urine(record: &Requisition) -> Vec<ValidationError> {
    let step = Step::UrineTests;
    let collection = SectionId::UrineCollection;
    let has_tests = record.any_flag(SectionId::UrineTests);
    let has_collection = record.any_flag(collection);

    if !has_tests && !has_collection {
        return vec![ValidationError::new(
            step,
            SectionId::UrineTests.key(),
            "Please select at least one urine test or collection test",
        )];
    }

    let mut errors = Vec::new();
    if has_collection {
        for (key, message) in [
            (field::START_DATE, "Collection Start Date is required"),
            (field::START_TIME, "Collection Start Time is required"),
            (field::END_DATE, "Collection End Date is required"),
            (field::END_TIME, "Collection End Time is required"),
        ] {
            if record.is_blank(collection, key) {
                errors.push(ValidationError::leaf(step, collection, key, message));
            }
        }

        if record.flag(collection, field::CRCLC) {
            for (key, message) in [
                (field::HEIGHT, "Height is required for BSA Corrected"),
                (field::WEIGHT, "Weight is required for BSA Corrected"),
            ] {
                if record.is_blank(collection, key) {
                    errors.push(ValidationError::leaf(step, collection, key, message));
                }
            }
        }
    }
    errors
}

fn microbiology(record: &Requisition) -> Vec<ValidationError> {
    let section = SectionId::Microbiology;
    let mut errors = selection(Step::Microbiology, section, record);
    if errors.is_empty() && record.is_blank(section, field::SOURCE) {
        errors.push(ValidationError::leaf(
            Step::Microbiology,
            section,
            field::SOURCE,
            "Source/Site is required when selecting microbiology tests",
        ));
    }
    errors
}
