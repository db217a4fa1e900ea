use labreq_core::models::requisition::Requisition;
use labreq_core::schema::SectionId;

pub fn patient_only() -> Requisition {
    let mut r = Requisition::new();
    for (key, value) in [
        ("clinicName", "Harbour Clinic"),
        ("phn", "9123456789"),
        ("chartNumber", "C-1001"),
        ("lastName", "Okafor"),
        ("firstName", "Ada"),
        ("collectionDate", "2024-05-02"),
        ("collectionTime", "08:30"),
    ] {
        r.set_text(SectionId::PatientInfo, key, value).unwrap();
    }
    r.set_text(SectionId::RequestingPhysician, "firstName", "Lee").unwrap();
    r.set_text(SectionId::RequestingPhysician, "lastName", "Chen").unwrap();
    r
}

/// A record that passes every step.
pub fn complete() -> Requisition {
    let mut r = patient_only();
    for (section, key) in [
        (SectionId::TherapeuticDrugs, "digi"),
        (SectionId::Hematology, "cbc"),
        (SectionId::Chemistry, "urea"),
        (SectionId::Lipids, "trig"),
        (SectionId::Biochemistry, "alb"),
        (SectionId::Prenatal, "preim"),
        (SectionId::UrineTests, "ua"),
        (SectionId::Hepatitis, "hcab"),
        (SectionId::Microbiology, "throatCAndS"),
    ] {
        r.set_flag(section, key, true).unwrap();
    }
    r.set_text(SectionId::Microbiology, "source", "Throat").unwrap();
    r
}
