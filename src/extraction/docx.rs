use super::ExtractError;
use docx_rs::{
    DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild,
};
use log::warn;
use std::path::Path;

/// Extracts paragraph and table text from a Word document.
///
/// Paragraphs end with a newline, table cells are separated by ` | `.
pub(super) fn extract(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;

    let doc = match docx_rs::read_docx(&bytes) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Failed to parse DOCX '{}': {}", path.display(), e);
            return Ok(String::new());
        }
    };

    let mut text = String::new();
    for child in &doc.document.children {
        push_document_child(child, &mut text);
    }
    Ok(text.trim().to_string())
}

fn push_document_child(child: &DocumentChild, out: &mut String) {
    match child {
        DocumentChild::Paragraph(para) => {
            push_paragraph_children(&para.children, out);
            out.push('\n');
        }
        DocumentChild::Table(table) => {
            for row in &table.rows {
                let TableChild::TableRow(tr) = row;
                for cell in &tr.cells {
                    let TableRowChild::TableCell(tc) = cell;
                    for content in &tc.children {
                        if let TableCellContent::Paragraph(para) = content {
                            push_paragraph_children(&para.children, out);
                            out.push_str(" | ");
                        }
                    }
                }
                out.push('\n');
            }
        }
        _ => {}
    }
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    if let RunChild::Text(text) = run_child {
                        out.push_str(&text.text);
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}
