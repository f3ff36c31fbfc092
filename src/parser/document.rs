//! XML document parser
//!
//! Parses one extracted document into its id, level, and ordered object
//! names. Documents look like:
//!
//! ```xml
//! <root>
//!   <var name="id" value="..."/>
//!   <var name="level" value="..."/>
//!   <objects>
//!     <object name="..."/>
//!   </objects>
//! </root>
//! ```

use crate::error::{Result, ZipRowsError};
use crate::rows::{LevelRow, ObjectRow};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Parsed document content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Value of the `var name="id"` entry
    pub id: String,

    /// Value of the `var name="level"` entry, kept as written
    pub level: String,

    /// Object names in declaration order; may be empty
    pub object_names: Vec<String>,
}

impl ParsedDocument {
    /// Project into the id-to-level report row.
    pub fn level_row(&self) -> LevelRow {
        LevelRow {
            id: self.id.clone(),
            level: self.level.clone(),
        }
    }

    /// Project into the id-to-object report rows, one per object name,
    /// in declaration order.
    pub fn object_rows(&self) -> Vec<ObjectRow> {
        self.object_names
            .iter()
            .map(|name| ObjectRow {
                id: self.id.clone(),
                name: name.clone(),
            })
            .collect()
    }
}

/// Parse a document file from path
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened or read (`ZipRowsError::Io`)
/// - The content is not valid XML (`ZipRowsError::InvalidDocument`)
/// - A required `var` entry is absent (`ZipRowsError::MissingField`)
pub fn parse_document(path: &Path) -> Result<ParsedDocument> {
    let document = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;

    parse_document_str(&content, &document)
}

/// Parse document content from a string; `document` names the source in
/// errors.
///
/// # Errors
///
/// Returns an error if the content is not valid XML
/// (`ZipRowsError::InvalidDocument`) or a required `var` entry is absent
/// (`ZipRowsError::MissingField`).
pub fn parse_document_str(content: &str, document: &str) -> Result<ParsedDocument> {
    let mut id = None;
    let mut level = None;
    let mut object_names = Vec::new();
    let mut in_objects = false;

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"var" => record_var(e, &reader, &mut id, &mut level),
                b"objects" => in_objects = true,
                b"object" if in_objects => {
                    if let Some(name) = parse_object_name(e, &reader) {
                        object_names.push(name);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"var" => record_var(e, &reader, &mut id, &mut level),
                // A self-closing <objects/> is a valid empty section.
                b"object" if in_objects => {
                    if let Some(name) = parse_object_name(e, &reader) {
                        object_names.push(name);
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => {
                if e.name().as_ref() == b"objects" {
                    in_objects = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ZipRowsError::InvalidDocument {
                    document: document.to_string(),
                    source: e,
                });
            }
            _ => {}
        }
        buf.clear();
    }

    let id = id.ok_or_else(|| ZipRowsError::MissingField {
        document: document.to_string(),
        field: "id",
    })?;
    let level = level.ok_or_else(|| ZipRowsError::MissingField {
        document: document.to_string(),
        field: "level",
    })?;

    Ok(ParsedDocument {
        id,
        level,
        object_names,
    })
}

/// Record a `var` element if it is the first `id` or `level` entry.
///
/// A `var` without a `value` attribute counts as absent.
fn record_var(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    id: &mut Option<String>,
    level: &mut Option<String>,
) {
    let (name, value) = parse_var_attrs(e, reader);
    match name.as_deref() {
        Some("id") if id.is_none() => *id = value,
        Some("level") if level.is_none() => *level = value,
        _ => {}
    }
}

/// Parse `var` attributes (`name` and `value`) from an element
fn parse_var_attrs(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
) -> (Option<String>, Option<String>) {
    let mut name = None;
    let mut value = None;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"name" => {
                if let Ok(val) = attr.decode_and_unescape_value(reader) {
                    name = Some(val.to_string());
                }
            }
            b"value" => {
                if let Ok(val) = attr.decode_and_unescape_value(reader) {
                    value = Some(val.to_string());
                }
            }
            _ => {}
        }
    }
    (name, value)
}

/// Parse the `name` attribute of an `object` element; entries without a
/// name carry no row and are skipped.
fn parse_object_name(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"name" {
            if let Ok(val) = attr.decode_and_unescape_value(reader) {
                return Some(val.to_string());
            }
        }
    }
    None
}
