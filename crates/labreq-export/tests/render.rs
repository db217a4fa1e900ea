use labreq_core::models::requisition::Requisition;
use labreq_core::models::stored::StoredRequisition;
use labreq_core::schema::SectionId;
use labreq_export::{render_document, write_document};

fn doc() -> StoredRequisition {
    let mut form = Requisition::new();
    form.set_text(SectionId::PatientInfo, "lastName", "Okafor").unwrap();
    form.set_flag(SectionId::Hematology, "cbc", true).unwrap();
    let mut doc = StoredRequisition::draft("user-1", form);
    doc.created_at = "2024-03-05T14:07:00Z".parse().unwrap();
    doc.updated_at = doc.created_at;
    doc
}

#[test]
fn renders_pdf_bytes_and_filename() {
    let doc = doc();
    let before = doc.clone();
    let rendered = render_document(&doc).unwrap();

    assert_eq!(rendered.filename, "SHA-requisition-2024-03-05-1407.pdf");
    assert!(rendered.bytes.starts_with(b"%PDF"));
    assert!(rendered.bytes.len() > 1000);
    assert_eq!(doc, before);
}

#[test]
fn writes_file_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_document(&doc(), dir.path()).unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "SHA-requisition-2024-03-05-1407.pdf"
    );
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}
