use crate::document::CellReader;
use crate::error::Docx2XlsxError;
use clap::ValueEnum;

/// How cell text is extracted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TextMode {
    /// Cell text unmodified
    #[default]
    Raw,
    /// Cell text with every whitespace character removed
    Clean,
}

impl TextMode {
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextMode::Raw => text.to_owned(),
            TextMode::Clean => clean_text(text),
        }
    }

    /// Reads the cell at `(row, col)` in this mode.
    pub fn read<R: CellReader + ?Sized>(&self, reader: &R, row: usize, col: usize) -> Result<String, Docx2XlsxError> {
        Ok(self.apply(reader.text_at(row, col)?))
    }
}

/// Removes all whitespace, not only at the ends: `"  a b\n c "` becomes `"abc"`.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect()
}
