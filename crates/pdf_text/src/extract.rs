//! Page-by-page text extraction and the text file writer.

use lopdf::Document;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{ExtractError, Result};

/// Anything that can hand out text one page at a time.
pub trait PageTextSource {
    /// Page numbers (1-based) in reading order.
    fn page_numbers(&self) -> Vec<u32>;

    /// Text of one page. `Ok(None)` means the page has no extractable text.
    fn page_text(&self, page: u32) -> Result<Option<String>>;
}

impl PageTextSource for Document {
    fn page_numbers(&self) -> Vec<u32> {
        // get_pages() is a BTreeMap, so keys are already ascending.
        self.get_pages().keys().copied().collect()
    }

    fn page_text(&self, page: u32) -> Result<Option<String>> {
        let text = self.extract_text(&[page]).map_err(|e| ExtractError::Page {
            page,
            reason: e.to_string(),
        })?;
        Ok(Some(text).filter(|t| !t.is_empty()))
    }
}

/// Concatenates the text of every page of `source`, in order.
///
/// Pages that error or yield nothing contribute an empty string.
pub fn extract_pages<S: PageTextSource + ?Sized>(source: &S) -> String {
    let mut text = String::new();
    for page in source.page_numbers() {
        match source.page_text(page) {
            Ok(Some(page_text)) => text.push_str(&page_text),
            Ok(None) => debug!(page, "no extractable text on page"),
            Err(e) => warn!(page, error = %e, "page extraction failed, using empty text"),
        }
    }
    text
}

/// Load a PDF document using lopdf.
pub fn load_pdf(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ExtractError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ExtractError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    Document::load_mem(&bytes).map_err(|e| ExtractError::InvalidPdf {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Extracts the text of the PDF at `path`.
pub fn extract_text_from_pdf(path: &Path) -> Result<String> {
    let document = load_pdf(path)?;
    let pages = document.get_pages().len();
    let text = extract_pages(&document);
    info!(path = %path.display(), pages, chars = text.chars().count(), "extracted PDF text");
    Ok(text)
}

/// Writes `text` as UTF-8, creating or truncating `path`.
pub fn save_text_to_file(text: &str, path: &Path) -> Result<()> {
    std::fs::write(path, text.as_bytes()).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Extracts `input` and saves the result to `output`. Returns the text.
pub fn extract_to_file(input: &Path, output: &Path) -> Result<String> {
    let text = extract_text_from_pdf(input)?;
    save_text_to_file(&text, output)?;
    info!(output = %output.display(), "wrote extracted text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// Scripted pages: `Ok(Some)`, `Ok(None)` or an error per page.
    struct FakePages(BTreeMap<u32, Option<std::result::Result<&'static str, &'static str>>>);

    impl PageTextSource for FakePages {
        fn page_numbers(&self) -> Vec<u32> {
            self.0.keys().copied().collect()
        }

        fn page_text(&self, page: u32) -> Result<Option<String>> {
            match self.0.get(&page).cloned().flatten() {
                None => Ok(None),
                Some(Ok(text)) => Ok(Some(text.to_string())),
                Some(Err(reason)) => Err(ExtractError::Page {
                    page,
                    reason: reason.to_string(),
                }),
            }
        }
    }

    #[test]
    fn pages_are_concatenated_in_order_without_delimiters() {
        let pages = FakePages(BTreeMap::from([
            (2, Some(Ok("two"))),
            (1, Some(Ok("one"))),
            (3, Some(Ok("three"))),
        ]));
        assert_eq!(extract_pages(&pages), "onetwothree");
    }

    #[test]
    fn failing_or_empty_pages_contribute_nothing() {
        let pages = FakePages(BTreeMap::from([
            (1, Some(Ok("a"))),
            (2, Some(Err("broken content stream"))),
            (3, None),
            (4, Some(Ok("b"))),
        ]));
        assert_eq!(extract_pages(&pages), "ab");
    }

    #[test]
    fn no_pages_is_empty_text() {
        assert_eq!(extract_pages(&FakePages(BTreeMap::new())), "");
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old contents that are longer").unwrap();

        save_text_to_file("naïve café", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "naïve café");
    }
}
