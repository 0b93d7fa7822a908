//! # Document Module
//!
//! Source side of the mapping: word-processor documents exposed as a list of
//! tables, each answering cell text lookups by `(row, col)`.
//!
//! - [`CellReader`] is the one capability the mapping engine needs from a table.
//! - [`locator`] picks the table carrying the marker label.
//! - [`text`] holds the raw and whitespace-collapsed extraction modes.
//! - [`docx`] reads `.docx` packages.

pub mod docx;
pub mod locator;
pub mod text;

use crate::document::docx::DocxDocument;
use crate::error::Docx2XlsxError;
use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;

/// Error types specific to reading documents
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("invalid table in docx file : {0}")]
    TableNotFound(String),

    #[error("Cell ({row}, {col}) is outside the table of '{name}'")]
    CellOutOfRange { name: String, row: usize, col: usize },

    #[error("Cannot read document format of '{0}'")]
    UnsupportedFormat(String),

    #[error("Missing part '{part}' in '{name}'")]
    MissingPart { name: String, part: String },
}

/// Read access to the cells of one table.
pub trait CellReader {
    /// Returns the text of the cell at `(row, col)`, both 0-based.
    fn text_at(&self, row: usize, col: usize) -> Result<&str, Docx2XlsxError>;
}

/// A table laid out on its column grid.
///
/// Merged cells are already expanded: every grid position covered by a
/// horizontally or vertically merged cell holds that cell's text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Name of the document the table came from
    pub(crate) name: String,
    pub(crate) rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: &str, rows: Vec<Vec<String>>) -> Self {
        Table {
            name: name.to_owned(),
            rows,
        }
    }

    /// Returns the cell text, `None` when the position lies outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

impl CellReader for Table {
    fn text_at(&self, row: usize, col: usize) -> Result<&str, Docx2XlsxError> {
        self.get(row, col).ok_or_else(|| {
            DocumentError::CellOutOfRange {
                name: self.name.to_owned(),
                row,
                col,
            }
            .into()
        })
    }
}

/// A loaded document: its name and its top-level tables in document order.
pub trait Document {
    fn name(&self) -> String;

    fn tables(&self) -> &[Table];
}

/// Opens a document, choosing the reader by file extension.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Box<dyn Document>, Docx2XlsxError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("docx") => {
            let document: Box<dyn Document> = Box::new(DocxDocument::open(path)?);
            Ok(document)
        }
        _ => Err(DocumentError::UnsupportedFormat(path.display().to_string()).into()),
    }
}
