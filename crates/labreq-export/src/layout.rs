//! Fixed-layout requisition pages.
//!
//! Pure and deterministic: the same record always yields the same pages.
//! Coordinates are millimetres from the top-left corner of an A4 page; the
//! PDF writer flips them.

use labreq_core::models::stored::StoredRequisition;
use labreq_core::schema::{SectionId, field};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 15.0;

pub const BODY_SIZE: f32 = 10.0;
pub const TITLE_SIZE: f32 = 11.0;
pub const FOOTER_SIZE: f32 = 8.0;
pub const CHECKBOX_SIZE: f32 = 3.0;

const ROW: f32 = 8.0;
const ITEM: f32 = 6.0;
const SECTION_GAP: f32 = 8.0;
const SECTION_MIN_SPACE: f32 = 50.0;
const INDENT: f32 = MARGIN + 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    /// `x` is the right edge of the text.
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        align: Align,
        text: String,
    },
    /// A square box whose top-left corner is at (`x`, `y`).
    Checkbox { x: f32, y: f32, checked: bool },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// All text on the page, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Checkbox { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pages: Vec<Page>,
}

/// Lay out a stored requisition as paper-form pages.
///
/// Patient block first, then one block per panel in form order, every test
/// shown with a checked or empty box. A block that would cross the bottom
/// margin continues on a new page under a "(continued)" heading. Each page
/// ends with page numbering and the collection date and time.
pub fn layout_requisition(doc: &StoredRequisition) -> Layout {
    let mut w = Writer::new();
    let form = &doc.form_data;

    let patient = SectionId::PatientInfo;
    let physician = SectionId::RequestingPhysician;

    w.text(INDENT, "Clinic name:");
    w.text(MARGIN + 30.0, form.text(patient, field::CLINIC_NAME));
    w.y += ROW;
    w.text(INDENT, "PHN:");
    w.text(MARGIN + 30.0, form.text(patient, field::PHN));
    w.text(MARGIN + 80.0, "Chart #:");
    w.text(MARGIN + 100.0, form.text(patient, field::CHART_NUMBER));
    w.y += ROW;
    w.text(INDENT, "Name:");
    w.text(
        MARGIN + 30.0,
        &full_name(form.text(patient, field::LAST_NAME), form.text(patient, field::FIRST_NAME)),
    );
    w.y += ROW;
    w.text(INDENT, "Collection Date:");
    w.text(MARGIN + 40.0, form.text(patient, field::COLLECTION_DATE));
    w.text(MARGIN + 80.0, "Time:");
    w.text(MARGIN + 95.0, form.text(patient, field::COLLECTION_TIME));
    w.y += ROW;
    w.text(INDENT, "Requesting Physician:");
    w.text(
        MARGIN + 50.0,
        &full_name(
            form.text(physician, field::LAST_NAME),
            form.text(physician, field::FIRST_NAME),
        ),
    );
    w.y += 7.0;

    for section in SectionId::ALL.into_iter().skip(2) {
        w.y += SECTION_GAP;
        panel(&mut w, doc, section);
    }

    let footer = format!(
        "Collection Date: {} Time: {}",
        form.text(patient, field::COLLECTION_DATE),
        form.text(patient, field::COLLECTION_TIME),
    );
    w.finish(&footer)
}

/// `SHA-requisition-{yyyy-MM-dd-HHmm}.pdf`, from the creation time in UTC.
pub fn filename(doc: &StoredRequisition) -> String {
    format!(
        "SHA-requisition-{}.pdf",
        doc.created_at.strftime("%Y-%m-%d-%H%M")
    )
}

fn full_name(last: &str, first: &str) -> String {
    match (last.is_empty(), first.is_empty()) {
        (true, true) => String::new(),
        (false, true) => last.to_string(),
        (true, false) => first.to_string(),
        (false, false) => format!("{last}, {first}"),
    }
}

fn panel(w: &mut Writer, doc: &StoredRequisition, section: SectionId) {
    let form = &doc.form_data;

    w.begin_section(section.schema().title.to_uppercase());

    if section == SectionId::UrineCollection {
        w.row(ROW);
        w.text(INDENT, "Collection Period:");
        w.y += ITEM;
        for (label, date, time) in [
            ("Start:", field::START_DATE, field::START_TIME),
            ("End:", field::END_DATE, field::END_TIME),
        ] {
            w.row(ROW);
            w.text(INDENT, label);
            w.text(MARGIN + 20.0, &format!("Date: {}", form.text(section, date)));
            w.text(MARGIN + 80.0, &format!("Time: {}", form.text(section, time)));
            w.y += ITEM;
        }
        w.y += ROW - ITEM;
    }

    for f in section.schema().checks() {
        w.row(ROW);
        let checked = form.flag(section, f.key);
        w.checkbox_item(INDENT, f.label, checked);
        if section == SectionId::TherapeuticDrugs && checked {
            w.text(MARGIN + 100.0, "Dosage:");
            w.text(MARGIN + 120.0, form.text(section, field::DOSAGE));
            w.text(MARGIN + 150.0, "Time:");
            w.text(MARGIN + 165.0, form.text(section, field::DATE_TIME));
        }
        w.y += ITEM;
    }

    match section {
        SectionId::Chemistry if !form.is_blank(section, field::WEIGHT) => {
            w.y += 4.0;
            w.row(ROW);
            w.text(INDENT, "Weight (kg):");
            w.text(MARGIN + 30.0, form.text(section, field::WEIGHT));
            w.y += ITEM;
        }
        SectionId::UrineCollection if form.flag(section, field::CRCLC) => {
            w.y += 4.0;
            w.row(ROW);
            w.text(INDENT, "Height (cm):");
            w.text(MARGIN + 30.0, form.text(section, field::HEIGHT));
            w.text(MARGIN + 80.0, "Weight (kg):");
            w.text(MARGIN + 105.0, form.text(section, field::WEIGHT));
            w.y += ROW;
        }
        SectionId::Microbiology => {
            let extras = [
                (field::SOURCE, "Source:", 25.0),
                (field::SOURCE2, "Source 2:", 25.0),
                (field::OTHER_TESTS, "Other Tests:", 35.0),
            ];
            let present: Vec<_> = extras
                .into_iter()
                .filter(|(key, _, _)| !form.is_blank(section, key))
                .collect();
            if !present.is_empty() {
                w.y += 4.0;
            }
            for (key, label, offset) in present {
                w.row(ROW);
                w.text(INDENT, label);
                w.text(MARGIN + offset, form.text(section, key));
                w.y += ITEM;
            }
        }
        _ => {}
    }
}

struct Writer {
    pages: Vec<Page>,
    y: f32,
    /// Heading of the block being written, repeated on continuation pages.
    section: Option<String>,
}

impl Writer {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: MARGIN,
            section: None,
        }
    }

    /// Open a block, on a fresh page when too little room is left for it.
    fn begin_section(&mut self, heading: String) {
        self.ensure(SECTION_MIN_SPACE);
        self.title(&heading);
        self.y += ROW;
        self.section = Some(heading);
    }

    /// Make room for one row of the current block. A row pushed onto a new
    /// page is preceded by the block's "(continued)" heading.
    fn row(&mut self, needed: f32) {
        if !self.ensure(needed) {
            return;
        }
        if let Some(heading) = self.section.clone() {
            self.title(&format!("{heading} (continued)"));
            self.y += ROW;
        }
    }

    /// Start a new page when `needed` mm would cross the bottom margin.
    /// Returns whether a page was added.
    fn ensure(&mut self, needed: f32) -> bool {
        if self.y + needed > PAGE_HEIGHT - MARGIN {
            self.pages.push(Page::default());
            self.y = MARGIN;
            true
        } else {
            false
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn text(&mut self, x: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        let y = self.y;
        self.push(DrawOp::Text {
            x,
            y,
            size: BODY_SIZE,
            bold: false,
            align: Align::Left,
            text: text.to_string(),
        });
    }

    fn title(&mut self, text: &str) {
        let y = self.y;
        self.push(DrawOp::Text {
            x: INDENT,
            y,
            size: TITLE_SIZE,
            bold: true,
            align: Align::Left,
            text: text.to_string(),
        });
    }

    fn checkbox_item(&mut self, x: f32, label: &str, checked: bool) {
        let y = self.y;
        self.push(DrawOp::Checkbox {
            x,
            y: y - CHECKBOX_SIZE,
            checked,
        });
        self.text(x + CHECKBOX_SIZE + 2.0, label);
    }

    fn finish(mut self, footer: &str) -> Layout {
        let total = self.pages.len();
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.ops.push(DrawOp::Text {
                x: PAGE_WIDTH - MARGIN,
                y: PAGE_HEIGHT - 5.0,
                size: FOOTER_SIZE,
                bold: false,
                align: Align::Right,
                text: format!("Page {} of {total}", i + 1),
            });
            page.ops.push(DrawOp::Text {
                x: MARGIN,
                y: PAGE_HEIGHT - 12.0,
                size: FOOTER_SIZE,
                bold: false,
                align: Align::Left,
                text: footer.to_string(),
            });
        }
        Layout { pages: self.pages }
    }
}

#[cfg(test)]
mod tests {
    use labreq_core::models::requisition::Requisition;

    use super::*;

    fn page_texts(layout: &Layout, page: usize) -> Vec<&str> {
        layout.pages[page].texts().collect()
    }

    #[test]
    fn row_past_bottom_margin_repeats_heading() {
        let mut w = Writer::new();
        w.begin_section("HEMATOLOGY".to_string());
        w.y = PAGE_HEIGHT - MARGIN - 2.0;
        w.row(ROW);
        w.checkbox_item(INDENT, "CBC", true);

        let layout = w.finish("");
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(&page_texts(&layout, 1)[..2], ["HEMATOLOGY (continued)", "CBC"]);
    }

    #[test]
    fn row_with_room_stays_on_page() {
        let mut w = Writer::new();
        w.begin_section("LIPIDS".to_string());
        w.row(ROW);
        w.checkbox_item(INDENT, "Triglyceride", false);

        let layout = w.finish("");
        assert_eq!(layout.pages.len(), 1);
        assert!(!page_texts(&layout, 0).iter().any(|t| t.ends_with("(continued)")));
    }

    #[test]
    fn block_start_near_bottom_moves_whole_heading() {
        let mut w = Writer::new();
        w.y = PAGE_HEIGHT - MARGIN - 10.0;
        w.begin_section("PRENATAL".to_string());

        let layout = w.finish("");
        assert_eq!(layout.pages.len(), 2);
        assert_eq!(page_texts(&layout, 1)[0], "PRENATAL");
    }

    #[test]
    fn long_panel_continues_under_its_heading() {
        let doc = StoredRequisition::draft("user-1", Requisition::new());
        let mut w = Writer::new();
        w.y = 232.0;
        panel(&mut w, &doc, SectionId::Biochemistry);

        let layout = w.finish("");
        assert!(layout.pages.len() >= 2);
        assert_eq!(page_texts(&layout, 0)[0], "BIOCHEMISTRY");
        assert_eq!(page_texts(&layout, 1)[0], "BIOCHEMISTRY (continued)");
    }

    #[test]
    fn trailing_weight_line_continues_under_its_heading() {
        let mut form = Requisition::new();
        form.set_flag(SectionId::Chemistry, field::CRCLE, true).unwrap();
        form.set_text(SectionId::Chemistry, field::WEIGHT, "72").unwrap();
        let doc = StoredRequisition::draft("user-1", form);

        let mut w = Writer::new();
        w.y = 226.0;
        panel(&mut w, &doc, SectionId::Chemistry);

        let layout = w.finish("");
        assert_eq!(layout.pages.len(), 2);
        assert!(page_texts(&layout, 0).contains(&"Est. Creatinine Clearance"));
        assert_eq!(
            &page_texts(&layout, 1)[..3],
            ["CHEMISTRY (continued)", "Weight (kg):", "72"]
        );
    }
}
