use labreq_core::schema::SectionId;
use serde::{Deserialize, Serialize};

/// Form steps, in the only order they can be visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PatientInfo,
    TherapeuticDrugs,
    Hematology,
    Chemistry,
    Lipids,
    Biochemistry,
    Prenatal,
    UrineTests,
    Hepatitis,
    Microbiology,
    Review,
}

impl Step {
    pub const ALL: [Step; 11] = [
        Step::PatientInfo,
        Step::TherapeuticDrugs,
        Step::Hematology,
        Step::Chemistry,
        Step::Lipids,
        Step::Biochemistry,
        Step::Prenatal,
        Step::UrineTests,
        Step::Hepatitis,
        Step::Microbiology,
        Step::Review,
    ];

    pub const FIRST: Step = Step::PatientInfo;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Step::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Step> {
        Step::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Step::from_index)
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::PatientInfo => "Patient Information",
            Step::TherapeuticDrugs => "Therapeutic Drugs",
            Step::Hematology => "Hematology",
            Step::Chemistry => "Chemistry",
            Step::Lipids => "Lipids",
            Step::Biochemistry => "Biochemistry",
            Step::Prenatal => "Prenatal",
            Step::UrineTests => "Urine Tests",
            Step::Hepatitis => "Hepatitis",
            Step::Microbiology => "Microbiology",
            Step::Review => "Review",
        }
    }

    /// Record sections edited on this step.
    pub fn sections(self) -> &'static [SectionId] {
        match self {
            Step::PatientInfo => &[SectionId::PatientInfo, SectionId::RequestingPhysician],
            Step::TherapeuticDrugs => &[SectionId::TherapeuticDrugs],
            Step::Hematology => &[SectionId::Hematology],
            Step::Chemistry => &[SectionId::Chemistry],
            Step::Lipids => &[SectionId::Lipids],
            Step::Biochemistry => &[SectionId::Biochemistry],
            Step::Prenatal => &[SectionId::Prenatal],
            Step::UrineTests => &[SectionId::UrineTests, SectionId::UrineCollection],
            Step::Hepatitis => &[SectionId::Hepatitis],
            Step::Microbiology => &[SectionId::Microbiology],
            Step::Review => &[],
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
