//! Destination side of the mapping: a single sheet that receives string cells.

pub mod xlsx;

use crate::error::Docx2XlsxError;

/// Row receiving the header labels (0-based)
pub const HEADER_ROW: u32 = 1;
/// Row receiving the first document's values (0-based)
pub const FIRST_DATA_ROW: u32 = HEADER_ROW + 1;
/// Columns per sheet in the xlsx format
pub const MAX_COLUMNS: usize = 16_384;

/// A sheet the mapping engine writes into.
pub trait OutputSink {
    /// Writes `text` at `(row, col)` with the shared cell format.
    fn write_cell(&mut self, row: u32, col: u16, text: &str) -> Result<(), Docx2XlsxError>;

    /// Persists everything written so far. Consumes the sink, so it happens once.
    fn close(self) -> Result<(), Docx2XlsxError>
    where
        Self: Sized;
}
