use labreq_core::models::stored::StoredRequisition;
use labreq_core::schema::{SectionId, field};
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::ExportError;

const NOT_PROVIDED: &str = "Not provided";

const TEMPLATE_NAME: &str = "summary.txt";

const TEMPLATE: &str = "\
BLOOD TEST REQUISITION
Status: {{ status }}

PATIENT
Clinic: {{ patient.clinic_name }}
PHN: {{ patient.phn }}
Chart Number: {{ patient.chart_number }}
Name: {{ patient.last_name }}, {{ patient.first_name }}
Collection: {{ patient.collection_date }} {{ patient.collection_time }}
Requesting Physician: {{ physician }}
{% for panel in panels %}
{{ panel.title }}
{% for test in panel.tests %}  [x] {{ test }}
{% endfor %}{% for note in panel.notes %}  {{ note }}
{% endfor %}{% endfor %}{% if panels | length == 0 %}
No tests selected
{% endif %}";

#[derive(Debug, Serialize)]
pub struct PatientSummary {
    pub clinic_name: String,
    pub phn: String,
    pub chart_number: String,
    pub last_name: String,
    pub first_name: String,
    pub collection_date: String,
    pub collection_time: String,
}

#[derive(Debug, Serialize)]
pub struct PanelSummary {
    pub title: &'static str,
    pub tests: Vec<&'static str>,
    pub notes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryContext {
    pub status: String,
    pub patient: PatientSummary,
    pub physician: String,
    pub panels: Vec<PanelSummary>,
}

/// The review-step view of a record: identification with "Not provided"
/// placeholders and only the selected tests of each panel.
pub fn summary_context(doc: &StoredRequisition) -> SummaryContext {
    let form = &doc.form_data;
    let or_default = |section: SectionId, key: &str| {
        let value = form.text(section, key).trim();
        if value.is_empty() {
            NOT_PROVIDED.to_string()
        } else {
            value.to_string()
        }
    };

    let patient = SectionId::PatientInfo;
    let physician = SectionId::RequestingPhysician;

    let mut panels = Vec::new();
    for section in SectionId::ALL.into_iter().skip(2) {
        let tests: Vec<_> = form.selected(section).iter().map(|f| f.label).collect();
        if tests.is_empty() {
            continue;
        }

        let mut notes = Vec::new();
        let mut note = |label: &str, key: &str| {
            if !form.is_blank(section, key) {
                notes.push(format!("{label}: {}", form.text(section, key).trim()));
            }
        };
        match section {
            SectionId::TherapeuticDrugs => {
                note("Dosage", field::DOSAGE);
                note("Date/Time", field::DATE_TIME);
            }
            SectionId::Chemistry => note("Weight (kg)", field::WEIGHT),
            SectionId::UrineCollection => {
                note("Start Date", field::START_DATE);
                note("Start Time", field::START_TIME);
                note("End Date", field::END_DATE);
                note("End Time", field::END_TIME);
                note("Height (cm)", field::HEIGHT);
                note("Weight (kg)", field::WEIGHT);
            }
            SectionId::Microbiology => {
                note("Source/Site", field::SOURCE);
                note("Source/Site 2", field::SOURCE2);
                note("Other Tests", field::OTHER_TESTS);
            }
            _ => {}
        }

        panels.push(PanelSummary {
            title: section.schema().title,
            tests,
            notes,
        });
    }

    let physician_name = format!(
        "{}, {}",
        or_default(physician, field::LAST_NAME),
        or_default(physician, field::FIRST_NAME)
    );

    SummaryContext {
        status: serde_json::to_value(doc.status)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
        patient: PatientSummary {
            clinic_name: or_default(patient, field::CLINIC_NAME),
            phn: or_default(patient, field::PHN),
            chart_number: or_default(patient, field::CHART_NUMBER),
            last_name: or_default(patient, field::LAST_NAME),
            first_name: or_default(patient, field::FIRST_NAME),
            collection_date: or_default(patient, field::COLLECTION_DATE),
            collection_time: or_default(patient, field::COLLECTION_TIME),
        },
        physician: physician_name,
        panels,
    }
}

/// Render the review summary as plain text.
pub fn render_summary(doc: &StoredRequisition) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(summary_context(doc))?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    Ok(tera.render(TEMPLATE_NAME, &context)?)
}
