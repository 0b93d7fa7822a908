//! docx2xlsx - collect form tables from a folder of .docx files into one .xlsx

use clap::error::ErrorKind;
use clap::Parser;
use docx2xlsx::cli;
use docx2xlsx::cli::Args;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            let _ = error.print();
            return match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(cli::EXIT_USAGE),
            };
        }
    };

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli::log_level(args.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli::execute(&args) {
        Ok(report) => {
            info!(
                processed = report.processed,
                skipped = report.skipped.len(),
                header = report.header_written,
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::from(cli::exit_code(&error))
        }
    }
}
