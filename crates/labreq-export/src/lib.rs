//! labreq-export
//!
//! Printable requisitions: a deterministic page layout, PDF output, and the
//! plain-text review summary.

pub mod error;
pub mod layout;
pub mod pdf;
pub mod summary;

use std::path::{Path, PathBuf};

use labreq_core::models::stored::StoredRequisition;

use crate::error::ExportError;

/// A rendered requisition ready to download or save.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Render a stored requisition to PDF. Never mutates the record.
pub fn render_document(doc: &StoredRequisition) -> Result<RenderedDocument, ExportError> {
    let layout = layout::layout_requisition(doc);
    let bytes = pdf::generate_pdf(&layout, "Blood Test Requisition", &doc.id.simple().to_string())?;
    Ok(RenderedDocument {
        filename: layout::filename(doc),
        bytes,
    })
}

/// Render and save into `dir` under the requisition filename.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// failure never leaves a partial PDF behind.
pub fn write_document(doc: &StoredRequisition, dir: &Path) -> Result<PathBuf, ExportError> {
    let rendered = render_document(doc)?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(&rendered.filename);
    let tmp_path = path.with_extension("pdf.tmp");
    if let Err(e) = std::fs::write(&tmp_path, &rendered.bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(id = %doc.id, path = %path.display(), "requisition pdf written");
    Ok(path)
}
