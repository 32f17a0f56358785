//! Plain-text extraction from PDF files.
//!
//! Pages are read in order starting at page 1 and their text is concatenated
//! with no delimiter. A page that fails to extract, or has no text, adds an
//! empty string instead of failing the whole document.

pub mod error;
pub mod extract;

pub use error::ExtractError;
pub use extract::{
    extract_pages, extract_text_from_pdf, extract_to_file, load_pdf, save_text_to_file,
    PageTextSource,
};
