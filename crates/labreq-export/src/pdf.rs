use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
};

use crate::error::ExportError;
use crate::layout::{Align, CHECKBOX_SIZE, DrawOp, Layout, PAGE_HEIGHT, PAGE_WIDTH};

const PT_TO_MM: f32 = 0.352_778;

/// Write a laid-out requisition as PDF bytes using the built-in Helvetica
/// faces. `document_id` becomes the PDF document id.
pub fn generate_pdf(layout: &Layout, title: &str, document_id: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let doc = doc.with_document_id(document_id.to_string());

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    for (i, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Layer {}", i + 1))
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for op in &page.ops {
            draw(&layer, op, &regular, &bold);
        }
    }

    let bytes = doc.save_to_bytes()?;
    tracing::debug!(pages = layout.pages.len(), bytes = bytes.len(), "pdf generated");
    Ok(bytes)
}

fn draw(layer: &PdfLayerReference, op: &DrawOp, regular: &IndirectFontRef, bold: &IndirectFontRef) {
    match op {
        DrawOp::Text {
            x,
            y,
            size,
            bold: is_bold,
            align,
            text,
        } => {
            let font = if *is_bold { bold } else { regular };
            let left = match align {
                Align::Left => *x,
                Align::Right => *x - text_width(text, *size),
            };
            layer.use_text(text.as_str(), *size, Mm(left), flip(*y), font);
        }
        DrawOp::Checkbox { x, y, checked } => {
            let (x, y, s) = (*x, *y, CHECKBOX_SIZE);
            layer.set_outline_thickness(0.2 / PT_TO_MM);
            layer.add_line(polyline(&[(x, y), (x + s, y), (x + s, y + s), (x, y + s)], true));
            if *checked {
                layer.set_outline_thickness(0.3 / PT_TO_MM);
                layer.add_line(polyline(&[(x + 0.5, y + 0.5), (x + s - 0.5, y + s - 0.5)], false));
                layer.add_line(polyline(&[(x + 0.5, y + s - 0.5), (x + s - 0.5, y + 0.5)], false));
            }
        }
    }
}

fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT - y)
}

fn polyline(points: &[(f32, f32)], closed: bool) -> Line {
    Line {
        points: points
            .iter()
            .map(|&(x, y)| (Point::new(Mm(x), flip(y)), false))
            .collect(),
        is_closed: closed,
    }
}

/// Approximate Helvetica advance width in millimetres.
pub fn text_width(text: &str, size_pt: f32) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.25,
            ' ' | 'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '/' | '-' => 0.33,
            'm' | 'w' | 'M' | 'W' | '@' => 0.85,
            c if c.is_ascii_uppercase() => 0.68,
            _ => 0.556,
        })
        .sum();
    em * size_pt * PT_TO_MM
}
