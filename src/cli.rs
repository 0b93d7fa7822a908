//! Command line surface of the `docx2xlsx` binary.

use crate::batch;
use crate::batch::BatchOptions;
use crate::batch::BatchReport;
use crate::batch::MissingTablePolicy;
use crate::document::locator::DEFAULT_MARKER;
use crate::document::text::TextMode;
use crate::error::Docx2XlsxError;
use clap::ArgAction;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Missing or malformed arguments
pub const EXIT_USAGE: u8 = 1;
/// Input directory or configuration file does not exist
pub const EXIT_INVALID_PATH: u8 = 2;
/// A document has no marker-bearing table
pub const EXIT_TABLE_NOT_FOUND: u8 = 2;
/// Any other failure
pub const EXIT_FAILURE: u8 = 1;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("invalid file name specified : {name} {path}")]
    InvalidPath { name: &'static str, path: String },
}

/// Reads docx files in the specified folder and writes their table cells to
/// one Excel file, according to the config file.
#[derive(Parser, Debug)]
#[command(name = "docx2xlsx")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Folder holding the *.docx files
    #[arg(short = 'd', long = "dir")]
    pub docxs_dir: PathBuf,

    /// The *.xlsx file to write
    #[arg(short = 'o', long = "output")]
    pub output_file: PathBuf,

    /// JSON file mapping table cells to spreadsheet columns
    #[arg(short = 'c', long = "config")]
    pub config_file: PathBuf,

    /// Label of the cell at row 1, column 0 identifying the table to read
    #[arg(long, default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// Text extraction for data values; header labels are always clean
    #[arg(long = "value-text", value_enum, default_value_t = TextMode::Raw)]
    pub value_text: TextMode,

    /// What to do with a document without the marker table
    #[arg(long = "on-missing-table", value_enum, default_value_t = MissingTablePolicy::Abort)]
    pub on_missing_table: MissingTablePolicy,

    /// Also pick up legacy *.doc files (they cannot be read and fail the run)
    #[arg(long = "include-doc", action = ArgAction::SetTrue)]
    pub include_doc: bool,

    /// Process files in directory listing order instead of sorted by name
    #[arg(long = "listing-order", action = ArgAction::SetTrue)]
    pub listing_order: bool,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Checks that the input directory and configuration file exist.
    pub fn validate(&self) -> Result<(), Docx2XlsxError> {
        if !self.docxs_dir.is_dir() {
            Err(CliError::InvalidPath {
                name: "docxs_dir",
                path: self.docxs_dir.display().to_string(),
            })?;
        }
        if !self.config_file.is_file() {
            Err(CliError::InvalidPath {
                name: "config_file",
                path: self.config_file.display().to_string(),
            })?;
        }
        Ok(())
    }

    pub fn options(&self) -> BatchOptions {
        BatchOptions {
            marker: self.marker.to_owned(),
            value_mode: self.value_text,
            on_missing_table: self.on_missing_table,
            include_legacy_doc: self.include_doc,
            sort_by_name: !self.listing_order,
        }
    }
}

/// Validates the paths and runs the batch.
pub fn execute(args: &Args) -> anyhow::Result<BatchReport> {
    args.validate()?;
    let report = batch::run(&args.docxs_dir, &args.output_file, &args.config_file, &args.options())?;
    Ok(report)
}

/// Exit code for a failed run.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<Docx2XlsxError>() {
        Some(Docx2XlsxError::CliError(CliError::InvalidPath { .. })) => EXIT_INVALID_PATH,
        Some(error) if error.is_table_not_found() => EXIT_TABLE_NOT_FOUND,
        _ => EXIT_FAILURE,
    }
}

/// Default log directive for a `-v` count
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::write_docx;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_required_and_defaults() {
        let args = Args::try_parse_from(["docx2xlsx", "-d", "forms", "-o", "out.xlsx", "-c", "cfg.json"]).unwrap();
        assert_eq!(args.docxs_dir, PathBuf::from("forms"));
        assert_eq!(args.marker, DEFAULT_MARKER);
        let options = args.options();
        assert_eq!(options.value_mode, TextMode::Raw);
        assert_eq!(options.on_missing_table, MissingTablePolicy::Abort);
        assert!(options.sort_by_name);
        assert!(!options.include_legacy_doc);
    }

    #[test]
    fn parse_options() {
        let args = Args::try_parse_from([
            "docx2xlsx", "--dir", "forms", "--output", "out.xlsx", "--config", "cfg.json",
            "--value-text", "clean", "--on-missing-table", "skip", "--include-doc", "--listing-order",
            "--marker", "Name", "-vv",
        ])
        .unwrap();
        let options = args.options();
        assert_eq!(options.value_mode, TextMode::Clean);
        assert_eq!(options.on_missing_table, MissingTablePolicy::Skip);
        assert!(options.include_legacy_doc);
        assert!(!options.sort_by_name);
        assert_eq!(options.marker, "Name");
        assert_eq!(log_level(args.verbose), "debug");
    }

    #[test]
    fn missing_argument_is_usage_error() {
        let error = Args::try_parse_from(["docx2xlsx", "-d", "forms", "-o", "out.xlsx"]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn invalid_paths() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("cfg.json");
        std::fs::write(&config, "{}").unwrap();

        let args = Args::try_parse_from([
            "docx2xlsx", "-d", "no/such/dir", "-o", "out.xlsx", "-c", config.to_str().unwrap(),
        ])
        .unwrap();
        let error = execute(&args).unwrap_err();
        assert_eq!(exit_code(&error), EXIT_INVALID_PATH);
        assert_eq!(error.to_string(), "invalid file name specified : docxs_dir no/such/dir");

        let args = Args::try_parse_from([
            "docx2xlsx", "-d", dir.path().to_str().unwrap(), "-o", "out.xlsx", "-c", dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let error = execute(&args).unwrap_err();
        assert_eq!(exit_code(&error), EXIT_INVALID_PATH);
    }

    #[test]
    fn malformed_config_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("cfg.json");
        std::fs::write(&config, "{ not json").unwrap();
        let output = dir.path().join("out.xlsx");

        let args = Args::try_parse_from([
            "docx2xlsx", "-d", dir.path().to_str().unwrap(), "-o", output.to_str().unwrap(), "-c", config.to_str().unwrap(),
        ])
        .unwrap();
        let error = execute(&args).unwrap_err();
        assert_eq!(exit_code(&error), EXIT_FAILURE);
        assert!(!output.exists());
    }

    #[test]
    fn missing_marker_table_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("cfg.json");
        std::fs::write(&config, "{}").unwrap();
        let input = dir.path().join("forms");
        std::fs::create_dir(&input).unwrap();
        write_docx(&input, "cover.docx", &[&[&["no marker"], &["here"]]]);
        let output = dir.path().join("out.xlsx");

        let args = Args::try_parse_from([
            "docx2xlsx", "-d", input.to_str().unwrap(), "-o", output.to_str().unwrap(), "-c", config.to_str().unwrap(),
        ])
        .unwrap();
        let error = execute(&args).unwrap_err();
        assert_eq!(exit_code(&error), EXIT_TABLE_NOT_FOUND);
        assert!(!output.exists());
    }

    #[test]
    fn empty_folder_writes_empty_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("cfg.json");
        std::fs::write(&config, "{}").unwrap();
        let input = dir.path().join("forms");
        std::fs::create_dir(&input).unwrap();
        let output = dir.path().join("out.xlsx");

        let args = Args::try_parse_from([
            "docx2xlsx", "-d", input.to_str().unwrap(), "-o", output.to_str().unwrap(), "-c", config.to_str().unwrap(),
        ])
        .unwrap();
        let report = execute(&args).unwrap();
        assert_eq!(report.processed, 0);
        assert!(!report.header_written);
        assert!(output.is_file());
    }
}
