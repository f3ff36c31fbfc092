pub mod document;

pub use document::{parse_document, parse_document_str, ParsedDocument};
