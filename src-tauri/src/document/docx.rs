//! DOCX raw text extraction (formatting discarded)

use super::RawText;
use crate::error::Result;

#[cfg(feature = "docx")]
pub(super) fn extract(bytes: &[u8], file_name: &str) -> Result<RawText> {
    use crate::error::DocQueryError;

    let doc = docx_rs::read_docx(bytes).map_err(|e| {
        tracing::warn!("[DocumentExtractor] DOCX parse FAILED for {}: {}", file_name, e);
        DocQueryError::ExtractionFailed {
            file_name: file_name.to_string(),
            reason: format!("failed to parse DOCX: {}", e),
        }
    })?;

    let mut all_text = String::new();
    for child in &doc.document.children {
        write_document_child(child, &mut all_text);
    }

    Ok(RawText {
        text: super::clean_text(&all_text),
        page_count: None,
    })
}

#[cfg(not(feature = "docx"))]
pub(super) fn extract(_bytes: &[u8], file_name: &str) -> Result<RawText> {
    tracing::error!(
        "[DocumentExtractor] Cannot read {}: built without the `docx` feature",
        file_name
    );
    Err(crate::error::DocQueryError::DependencyUnavailable { library: "DOCX" })
}

/// Body paragraphs become lines; table rows become `cell | cell` lines
#[cfg(feature = "docx")]
fn write_document_child(element: &docx_rs::DocumentChild, output: &mut String) {
    match element {
        docx_rs::DocumentChild::Paragraph(para) => {
            write_paragraph(para, output);
            output.push('\n');
        }
        docx_rs::DocumentChild::Table(table) => {
            for row in &table.rows {
                let docx_rs::TableChild::TableRow(tr) = row;
                let mut cells = Vec::new();
                for cell in &tr.cells {
                    let docx_rs::TableRowChild::TableCell(tc) = cell;
                    let mut cell_text = String::new();
                    for child in &tc.children {
                        if let docx_rs::TableCellContent::Paragraph(para) = child {
                            if !cell_text.is_empty() {
                                cell_text.push(' ');
                            }
                            write_paragraph(para, &mut cell_text);
                        }
                    }
                    cells.push(cell_text.trim().to_string());
                }
                output.push_str(&cells.join(" | "));
                output.push('\n');
            }
        }
        _ => {}
    }
}

#[cfg(feature = "docx")]
fn write_paragraph(para: &docx_rs::Paragraph, output: &mut String) {
    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => write_run(run, output),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for link_child in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = link_child {
                        write_run(run, output);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(feature = "docx")]
fn write_run(run: &docx_rs::Run, output: &mut String) {
    for run_child in &run.children {
        if let docx_rs::RunChild::Text(text) = run_child {
            output.push_str(&text.text);
        }
    }
}
