use crate::error::Docx2XlsxError;
use crate::error::ResultMessage;
use crate::workbook::OutputSink;
use rust_xlsxwriter::DocProperties;
use rust_xlsxwriter::ExcelDateTime;
use rust_xlsxwriter::Format;
use rust_xlsxwriter::FormatAlign;
use rust_xlsxwriter::Workbook;
use rust_xlsxwriter::Worksheet;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

/// Creation date stamped into the document properties so equal input gives equal bytes
const CREATION_DATE: (u16, u8, u8) = (2000, 1, 1);

/// `.xlsx` file with one worksheet, saved on [`OutputSink::close`]
pub struct XlsxSink {
    path: PathBuf,
    worksheet: Worksheet,
    format: Format,
}

impl XlsxSink {
    /// Prepares a workbook that will be saved to `path`.
    ///
    /// Fails early when the parent directory of `path` does not exist.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Docx2XlsxError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            if !parent.is_dir() {
                let error = std::io::Error::new(ErrorKind::NotFound, format!("'{}' is not a directory", parent.display()));
                return Err(Docx2XlsxError::from(error)).with_prefix(&format!("Create xlsx '{}'", path.display()));
            }
        }
        let format = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
        Ok(XlsxSink {
            path,
            worksheet: Worksheet::new(),
            format,
        })
    }
}

impl OutputSink for XlsxSink {
    fn write_cell(&mut self, row: u32, col: u16, text: &str) -> Result<(), Docx2XlsxError> {
        self.worksheet.write_string_with_format(row, col, text, &self.format)?;
        Ok(())
    }

    fn close(self) -> Result<(), Docx2XlsxError> {
        let (year, month, day) = CREATION_DATE;
        let created = ExcelDateTime::from_ymd(year, month, day)?;
        let properties = DocProperties::new().set_creation_datetime(&created);

        let mut workbook = Workbook::new();
        workbook.set_properties(&properties);
        workbook.push_worksheet(self.worksheet);
        workbook
            .save(&self.path)
            .map_err(Docx2XlsxError::from)
            .with_prefix(&format!("Save xlsx '{}'", self.path.display()))?;
        debug!(path = %self.path.display(), "Saved workbook");
        Ok(())
    }
}
