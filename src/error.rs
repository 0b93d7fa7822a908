use thiserror::Error;

/// Main error type for docx2xlsx.
/// Aggregates errors from various sources including standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum Docx2XlsxError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    XlsxWriterError(#[from] rust_xlsxwriter::XlsxError),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Mapping module errors
    #[error("{0}")]
    RangeError(#[from] crate::mapping::range::RangeError),

    #[error("{0}")]
    ConfigError(#[from] crate::mapping::config::ConfigError),

    // Document module errors
    #[error("{0}")]
    DocumentError(#[from] crate::document::DocumentError),

    // Command line errors
    #[error("{0}")]
    CliError(#[from] crate::cli::CliError),
}

impl Docx2XlsxError {
    /// Returns true if this error, or the error it wraps, reports a document
    /// without any marker-bearing table.
    pub fn is_table_not_found(&self) -> bool {
        matches!(
            self,
            Docx2XlsxError::DocumentError(crate::document::DocumentError::TableNotFound(_))
        )
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, Docx2XlsxError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| Docx2XlsxError::WithContextError(format!("{}: {}", message, e)))
    }
}
