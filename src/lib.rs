//! # docx2xlsx
//!
//! Batch-collects filled-in form documents into one roster spreadsheet.
//!
//! Every `.docx` in a folder is expected to carry one recognizable table, the
//! one whose cell at row 1, column 0 reads "姓名" ("Name"). A JSON mapping
//! configuration names, per section, a source row of that table and the
//! columns to copy: `key` columns become the shared header row (taken once,
//! from the first document), `val` columns become one data row per document.
//!
//! ## Range expressions
//!
//! - `1~3`: columns 1, 2 and 3
//! - `3,5,10`: exactly these columns, in this order
//! - `1,+2`: 1, 3, 5, ... up to the last column of the section's `col` range
//! - `7`: a single column
//!
//! ## Modules
//!
//! - [`mapping`]: range parser, configuration model, mapping engine
//! - [`document`]: table access, table locator, text modes, `.docx` reader
//! - [`workbook`]: output sink and the `.xlsx` writer
//! - [`batch`]: the per-folder driver
//! - [`cli`]: arguments, path checks, exit codes

pub mod batch;
pub mod cli;
pub mod document;
pub mod error;
pub mod helpers;
pub mod mapping;
pub mod workbook;

#[cfg(test)]
pub(crate) mod testutil;

pub use crate::error::Docx2XlsxError;
