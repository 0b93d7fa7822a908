//! # Batch Driver
//!
//! Runs the mapping engine over every document of an input directory, one
//! document at a time, and saves the workbook once at the end. A failure
//! before the end leaves no output file behind.

use crate::document;
use crate::document::locator::locate;
use crate::document::locator::DEFAULT_MARKER;
use crate::document::text::TextMode;
use crate::document::DocumentError;
use crate::error::Docx2XlsxError;
use crate::error::ResultMessage;
use crate::mapping::config::MappingConfig;
use crate::mapping::engine::MappingEngine;
use crate::mapping::engine::RowCursor;
use crate::workbook::xlsx::XlsxSink;
use crate::workbook::OutputSink;
use clap::ValueEnum;
use glob::MatchOptions;
use glob::Pattern;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// File name pattern of documents that can be read
const DOCX_PATTERN: &str = "*.docx";
/// File name pattern of legacy documents, only listed on request
const DOC_PATTERN: &str = "*.doc";

/// What to do with a document that has no marker-bearing table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MissingTablePolicy {
    /// Stop the whole run
    #[default]
    Abort,
    /// Log a warning and continue with the next document
    Skip,
}

/// Run options besides the three paths.
#[derive(Clone, Debug)]
pub struct BatchOptions {
    /// Label the probe cell must hold, whitespace ignored
    pub marker: String,
    /// Extraction mode for data values
    pub value_mode: TextMode,
    pub on_missing_table: MissingTablePolicy,
    /// Also list `.doc` files, which the reader then rejects
    pub include_legacy_doc: bool,
    /// Process files sorted by name instead of directory listing order
    pub sort_by_name: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            marker: DEFAULT_MARKER.to_owned(),
            value_mode: TextMode::default(),
            on_missing_table: MissingTablePolicy::default(),
            include_legacy_doc: false,
            sort_by_name: true,
        }
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Documents that produced a data row
    pub processed: usize,
    /// Documents skipped for lack of a marker table
    pub skipped: Vec<PathBuf>,
    pub header_written: bool,
}

/// Maps every document of `input_dir` into a new workbook at `output_file`.
pub fn run<P, Q, R>(input_dir: P, output_file: Q, config_file: R, options: &BatchOptions) -> Result<BatchReport, Docx2XlsxError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let config = MappingConfig::load(config_file)?;
    let mut sink = XlsxSink::create(output_file.as_ref())?;
    let report = run_with_sink(input_dir, &config, &mut sink, options)?;
    sink.close()?;
    info!(
        output = %output_file.as_ref().display(),
        processed = report.processed,
        skipped = report.skipped.len(),
        "Wrote workbook"
    );
    Ok(report)
}

/// Maps every document of `input_dir` into `sink` without closing it.
pub fn run_with_sink<P, S>(input_dir: P, config: &MappingConfig, sink: &mut S, options: &BatchOptions) -> Result<BatchReport, Docx2XlsxError>
where
    P: AsRef<Path>,
    S: OutputSink + ?Sized,
{
    let engine = MappingEngine::new(config, options.value_mode)?;
    let mut cursor = RowCursor::default();
    let mut report = BatchReport::default();
    for path in list_documents(input_dir.as_ref(), options)? {
        let document = document::open(&path)?;
        let table = match locate(document.tables(), &options.marker) {
            Some(table) => table,
            None => match options.on_missing_table {
                MissingTablePolicy::Abort => Err(DocumentError::TableNotFound(path.display().to_string()))?,
                MissingTablePolicy::Skip => {
                    warn!(document = %document.name(), "No table with marker '{}', skipped", options.marker);
                    report.skipped.push(path);
                    continue;
                }
            },
        };
        let row = cursor.data_row;
        engine.apply(table, sink, &mut cursor)?;
        info!(document = %document.name(), row, "Mapped document");
        report.processed += 1;
    }
    report.header_written = cursor.header_written;
    Ok(report)
}

/// Lists the documents of `dir` matching the enabled extensions, case-insensitively.
///
/// Sub-directories are ignored. Without `sort_by_name` the order is whatever the
/// file system returns.
pub fn list_documents(dir: &Path, options: &BatchOptions) -> Result<Vec<PathBuf>, Docx2XlsxError> {
    let mut patterns = vec![Pattern::new(DOCX_PATTERN)?];
    if options.include_legacy_doc {
        patterns.push(Pattern::new(DOC_PATTERN)?);
    }
    let match_options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let prefix = format!("List documents in '{}'", dir.display());
    let mut documents = Vec::<PathBuf>::new();
    for entry in std::fs::read_dir(dir).map_err(Docx2XlsxError::from).with_prefix(&prefix)? {
        let entry = entry.map_err(Docx2XlsxError::from).with_prefix(&prefix)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if patterns.iter().any(|pattern| pattern.matches_with(&file_name, match_options)) {
            documents.push(path);
        } else {
            debug!(file = %file_name, "Not a document, ignored");
        }
    }
    if options.sort_by_name {
        documents.sort();
    }
    Ok(documents)
}
