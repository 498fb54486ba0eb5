//! PDF text extraction, one page at a time

use super::RawText;
use crate::error::Result;

/// Separator placed between consecutive pages
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Extract text from PDF bytes using pdf-extract.
/// Wrapped in catch_unwind: pdf-extract (and its cff-parser dependency)
/// can panic on certain fonts/glyphs.
#[cfg(feature = "pdf")]
pub(super) fn extract(bytes: &[u8], file_name: &str) -> Result<RawText> {
    use crate::error::DocQueryError;

    tracing::debug!("[DocumentExtractor] PDF size: {} bytes", bytes.len());

    let pages = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    })) {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            tracing::warn!(
                "[DocumentExtractor] PDF extraction FAILED for {}: {}",
                file_name,
                e
            );
            return Err(DocQueryError::ExtractionFailed {
                file_name: file_name.to_string(),
                reason: e.to_string(),
            });
        }
        Err(_panic) => {
            tracing::error!(
                "[DocumentExtractor] PDF extraction PANICKED for {} - likely malformed font/glyph",
                file_name
            );
            return Err(DocQueryError::ExtractionFailed {
                file_name: file_name.to_string(),
                reason: "parser panicked, likely on a malformed font".to_string(),
            });
        }
    };

    Ok(RawText {
        page_count: Some(pages.len()),
        text: join_pages(&pages),
    })
}

#[cfg(not(feature = "pdf"))]
pub(super) fn extract(_bytes: &[u8], file_name: &str) -> Result<RawText> {
    tracing::error!(
        "[DocumentExtractor] Cannot read {}: built without the `pdf` feature",
        file_name
    );
    Err(crate::error::DocQueryError::DependencyUnavailable { library: "PDF" })
}

/// Clean each page and join them in order with a blank line.
/// Pages without text are skipped.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|page| super::clean_text(page.as_ref()))
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// Build a PDF with one line of Courier text per page
#[cfg(all(test, feature = "pdf"))]
pub(crate) fn build_test_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
