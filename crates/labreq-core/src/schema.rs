//! The requisition panel schema.
//!
//! One static, ordered table of sections and leaf fields. Record defaults,
//! step validation, normalization of stored documents, the PDF layout and the
//! review summary are all derived from this table.

use serde::{Deserialize, Serialize};

/// Leaf keys referenced directly by validators and renderers.
pub mod field {
    pub const CLINIC_NAME: &str = "clinicName";
    pub const PHN: &str = "phn";
    pub const CHART_NUMBER: &str = "chartNumber";
    pub const LAST_NAME: &str = "lastName";
    pub const FIRST_NAME: &str = "firstName";
    pub const COLLECTION_DATE: &str = "collectionDate";
    pub const COLLECTION_TIME: &str = "collectionTime";
    pub const DOSAGE: &str = "dosage";
    pub const DATE_TIME: &str = "dateTime";
    pub const CRCLE: &str = "crcle";
    pub const WEIGHT: &str = "weight";
    pub const HEIGHT: &str = "height";
    pub const START_DATE: &str = "startDate";
    pub const START_TIME: &str = "startTime";
    pub const END_DATE: &str = "endDate";
    pub const END_TIME: &str = "endTime";
    pub const CRCLC: &str = "crclc";
    pub const SOURCE: &str = "source";
    pub const SOURCE2: &str = "source2";
    pub const OTHER_TESTS: &str = "otherTests";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    PatientInfo,
    RequestingPhysician,
    TherapeuticDrugs,
    Hematology,
    Chemistry,
    Lipids,
    Biochemistry,
    Prenatal,
    UrineTests,
    UrineCollection,
    Hepatitis,
    Microbiology,
}

impl SectionId {
    pub const ALL: [SectionId; 12] = [
        SectionId::PatientInfo,
        SectionId::RequestingPhysician,
        SectionId::TherapeuticDrugs,
        SectionId::Hematology,
        SectionId::Chemistry,
        SectionId::Lipids,
        SectionId::Biochemistry,
        SectionId::Prenatal,
        SectionId::UrineTests,
        SectionId::UrineCollection,
        SectionId::Hepatitis,
        SectionId::Microbiology,
    ];

    /// Wire key of the section inside the stored `formData` document.
    pub fn key(self) -> &'static str {
        match self {
            SectionId::PatientInfo => "patientInfo",
            SectionId::RequestingPhysician => "requestingPhysician",
            SectionId::TherapeuticDrugs => "therapeuticDrugs",
            SectionId::Hematology => "hematology",
            SectionId::Chemistry => "chemistry",
            SectionId::Lipids => "lipids",
            SectionId::Biochemistry => "biochemistry",
            SectionId::Prenatal => "prenatal",
            SectionId::UrineTests => "urineTests",
            SectionId::UrineCollection => "urineCollection",
            SectionId::Hepatitis => "hepatitis",
            SectionId::Microbiology => "microbiology",
        }
    }

    pub fn schema(self) -> &'static SectionSchema {
        &SECTIONS[self as usize]
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A test selection box; defaults to `false`.
    Check,
    /// Free text; defaults to the empty string.
    Text,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Check => "check",
            FieldKind::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSchema {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Unconditionally required. Conditional requirements live in the
    /// step validators.
    pub required: bool,
}

#[derive(Debug, Serialize)]
pub struct SectionSchema {
    pub id: SectionId,
    pub title: &'static str,
    /// Noun used in the "Please select at least one ..." message for panels
    /// that require a selection.
    pub selection_noun: Option<&'static str>,
    pub fields: &'static [FieldSchema],
}

impl SectionSchema {
    pub fn field(&self, key: &str) -> Option<&'static FieldSchema> {
        let fields: &'static [FieldSchema] = self.fields;
        fields.iter().find(|f| f.key == key)
    }

    pub fn checks(&self) -> impl Iterator<Item = &'static FieldSchema> {
        let fields: &'static [FieldSchema] = self.fields;
        fields.iter().filter(|f| f.kind == FieldKind::Check)
    }
}

const fn check(key: &'static str, label: &'static str) -> FieldSchema {
    FieldSchema {
        key,
        label,
        kind: FieldKind::Check,
        required: false,
    }
}

const fn text(key: &'static str, label: &'static str) -> FieldSchema {
    FieldSchema {
        key,
        label,
        kind: FieldKind::Text,
        required: false,
    }
}

const fn required(key: &'static str, label: &'static str) -> FieldSchema {
    FieldSchema {
        key,
        label,
        kind: FieldKind::Text,
        required: true,
    }
}

/// All sections, in form order. Indexed by `SectionId as usize`.
pub static SECTIONS: [SectionSchema; 12] = [
    SectionSchema {
        id: SectionId::PatientInfo,
        title: "Patient Information",
        selection_noun: None,
        fields: &[
            required(field::CLINIC_NAME, "Clinic Name"),
            required(field::PHN, "PHN"),
            required(field::CHART_NUMBER, "Chart Number"),
            required(field::LAST_NAME, "Last Name"),
            required(field::FIRST_NAME, "First Name"),
            required(field::COLLECTION_DATE, "Collection Date"),
            text(field::COLLECTION_TIME, "Collection Time"),
        ],
    },
    SectionSchema {
        id: SectionId::RequestingPhysician,
        title: "Requesting Physician",
        selection_noun: None,
        fields: &[
            required(field::FIRST_NAME, "Physician First Name"),
            required(field::LAST_NAME, "Physician Last Name"),
        ],
    },
    SectionSchema {
        id: SectionId::TherapeuticDrugs,
        title: "Therapeutic Drugs",
        selection_noun: Some("therapeutic drug test"),
        fields: &[
            check("carbz", "Carbamazepine (Tegretol)"),
            check("digi", "Digoxin"),
            check("lith", "Lithium"),
            check("phenb", "Phenobarbital"),
            check("ptny", "Phenytoin (Dilantin)"),
            check("valpr", "Valproic Acid (Epival)"),
            check("cycl", "Cyclosporin - Pre"),
            check("cy2", "Cyclosporin - Post"),
            check("tacr", "Tacrolimus - Pre"),
            check("siro", "Sirolimus - Pre"),
            text(field::DOSAGE, "Dosage"),
            text(field::DATE_TIME, "Date/Time of Last Dose"),
        ],
    },
    SectionSchema {
        id: SectionId::Hematology,
        title: "Hematology",
        selection_noun: Some("hematology test"),
        fields: &[
            check("cbc", "CBC"),
            check("cbcDiff", "CBC & diff"),
            check("reticulocyteCount", "Reticulocyte Count"),
            check("dDimer", "D-Dimer"),
            check("fibrinogenLevel", "Fibrinogen Level"),
            check("ptInr", "PT (INR)"),
            check("pttAptt", "PTT (APTT)"),
        ],
    },
    SectionSchema {
        id: SectionId::Chemistry,
        title: "Chemistry",
        selection_noun: Some("chemistry test"),
        fields: &[
            check("lyte4", "Electrolytes - Na, K, Cl, CO2"),
            check("creat", "Creatinine + eGFR"),
            check("urea", "Urea"),
            check("glucr", "Glucose - Random"),
            check("glucf", "Glucose - FASTING"),
            check("hma1c", "Hemoglobin A1C"),
            check(field::CRCLE, "Est. Creatinine Clearance"),
            text(field::WEIGHT, "Weight (kg)"),
        ],
    },
    SectionSchema {
        id: SectionId::Lipids,
        title: "Lipids",
        selection_noun: Some("lipids test"),
        fields: &[
            check("trig", "Triglyceride - FASTING"),
            check("chol", "Cholesterol - Total - FASTING"),
            check("lipid", "Chol, Trig, HDL, LDL - FASTING"),
            check("ges1h", "Gestational Challenge (50g) - Non Fasting"),
            check("ges2h", "Gestational Tolerance (75g) - FASTING"),
            check("gtt2h", "Glucose Tolerance (75g) - FASTING"),
        ],
    },
    SectionSchema {
        id: SectionId::Biochemistry,
        title: "Biochemistry",
        selection_noun: Some("biochemistry test"),
        fields: &[
            check("alb", "Albumin"),
            check("ca", "Calcium"),
            check("phos", "Phosphate"),
            check("mg", "Magnesium"),
            check("uric", "Uric Acid"),
            check("alp", "Alkaline Phosphatase"),
            check("alt", "Alanine Aminotransferase"),
            check("ast", "Aspartate Aminotransferase"),
            check("ck", "CK - Total"),
            check("ld", "Lactate Dehydrogenase"),
            check("lip", "Lipase"),
            check("ggt", "Gamma Glutamyltransferase"),
            check("bilt", "Bilirubin - Total"),
            check("bilfr", "Bilirubin - Fractionation"),
            check("bhcg", "BHCG (Quantitative - Level)"),
            check("ironb", "Iron and Total Iron Binding Capacity"),
            check("fer", "Ferritin"),
            check("psa", "Prostate Specific Antigen"),
            check("thysa", "Thyroid Stimulating Hormone"),
            check("frt4", "Free T4 (Free Thyroxine)"),
            check("atpa", "Thyroid Peroxidase Antibody"),
            check("fshlh", "Follicle Stimulating Hormone/Luteinizing Hormone"),
            check("ediol", "Estradiol"),
            check("prge", "Progesterone"),
            check("prl", "Prolactin"),
            check("waser", "Syphilis"),
            check("hiv", "HIV"),
            check("crph", "C-Reactive Protein-HS"),
            check("rhf", "Rheumatoid Factor"),
            check("tnths", "Troponin T HS"),
            check("tp", "Total Protein"),
            check("pes", "Serum Protein Electrophoresis"),
            check("fitOccult", "Fecal Immunochemical Test (FIT) for Occult Blood"),
        ],
    },
    SectionSchema {
        id: SectionId::Prenatal,
        title: "Prenatal",
        selection_noun: Some("prenatal test"),
        fields: &[
            check("preim", "Prenatal Screen"),
            check("pblgp", "Prenatal Group and Screen"),
            check("paternalTest", "Prenatal Group*, Phenotyping (Paternal Testing)"),
        ],
    },
    SectionSchema {
        id: SectionId::UrineTests,
        title: "Urine Tests",
        selection_noun: None,
        fields: &[
            check("ua", "Voided Urinalysis"),
            check("catheterizedUrinalysis", "Catheterized Urinalysis"),
            check("hcgu", "HCG - Urine"),
            check("clgp", "Urine for Chlamydia and G.C. - First stream"),
            check("albcr", "Random Albumin/Creatinine Ratio (Microalbumin)"),
        ],
    },
    SectionSchema {
        id: SectionId::UrineCollection,
        title: "24-Hour Urine Collection",
        selection_noun: None,
        fields: &[
            text(field::START_DATE, "Collection Start Date"),
            text(field::START_TIME, "Collection Start Time"),
            text(field::END_DATE, "Collection End Date"),
            text(field::END_TIME, "Collection End Time"),
            check("caud", "Calcium"),
            check("creud", "Creatinine"),
            check("crcl", "Creatinine Clearance"),
            check(field::CRCLC, "Creatinine Clearance (BSA Corrected)"),
            check("po4ud", "Phosphate"),
            check("tpud", "Protein"),
            check("peu", "Protein Electrophoresis"),
            check("nakud", "Sodium / Potassium"),
            check("ureud", "Urea"),
            check("uraud", "Uric Acid"),
            text(field::HEIGHT, "Height (cm)"),
            text(field::WEIGHT, "Weight (kg)"),
        ],
    },
    SectionSchema {
        id: SectionId::Hepatitis,
        title: "Hepatitis & Viral Serology",
        selection_noun: Some("hepatitis test"),
        fields: &[
            check("heppa", "Acute viral hepatitis undefined etiology"),
            check("hbchb", "Hepatitis B (Hep B S Ab, Hep B S Ag, Hep Bc Tot Ab)"),
            check("hcab", "Hepatitis C (Hep C Ab)"),
            check("haabt", "Hepatitis A (Hep A Total Ab)"),
            check("hbabs", "Hepatitis B (Hep B S Ab)"),
            check("cmva", "Acute CMV (CMV IgM)"),
            check("cmvi", "Chronic or Past Exposure to CMV (CMV IgG)"),
        ],
    },
    SectionSchema {
        id: SectionId::Microbiology,
        title: "Microbiology",
        selection_noun: Some("microbiology test"),
        fields: &[
            check("bloodCultureCAndS", "Blood Culture - C & S"),
            check("cervixSwabGC", "Cervix Swab - G.C."),
            check("sputumCAndS", "Sputum - C & S"),
            check("sputumTBAfb", "Sputum - TB/AFB"),
            check("stoolCAndS", "Stool - C & S"),
            check("stoolOAndP", "Stool - O & P"),
            check("stoolCDiff", "Stool - CDIFF"),
            check("throatCAndS", "Throat - C & S"),
            check("urethralSwabGC", "Urethral Swab - G.C."),
            check("urineCatheterCAndS", "Urine - Catheter - C & S"),
            check("urineCatheterYeast", "Urine - Catheter - YEAST"),
            check("urineMidstreamCAndS", "Urine - Midstream - C & S"),
            check("urineMidstreamYeast", "Urine - Midstream - YEAST"),
            check("vaginalBV", "Vaginal - BV"),
            check("vaginalTrich", "Vaginal - TRICH"),
            check("groupBStrep", "VAG/Rectal Swab - GROUP B STREP - PREGNANCY ONLY"),
            text(field::SOURCE, "Source/Site"),
            text(field::SOURCE2, "Source/Site 2"),
            text(field::OTHER_TESTS, "Other Tests"),
        ],
    },
];
