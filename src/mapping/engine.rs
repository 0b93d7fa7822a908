//! # Mapping Engine
//!
//! Applies every configured section to one located table. For each section,
//! in declaration order:
//!
//! 1. while the run's header row is still unwritten, the `key` columns of the
//!    section's source row are read as clean text into the header row,
//!    starting at `col_start`;
//! 2. the `val` columns of the same source row are read into the current data
//!    row, starting at `col_start`.
//!
//! After the last section the header is marked written for the rest of the run
//! and the data row advances by one.

use crate::document::text::TextMode;
use crate::document::CellReader;
use crate::error::Docx2XlsxError;
use crate::mapping::config::MappingConfig;
use crate::mapping::config::ResolvedSection;
use crate::workbook::OutputSink;
use crate::workbook::FIRST_DATA_ROW;
use crate::workbook::HEADER_ROW;
use tracing::debug;

/// Output position shared by all documents of one run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowCursor {
    /// Row the next document's values go to
    pub data_row: u32,
    /// Whether the header row has been written, never reset within a run
    pub header_written: bool,
}

impl Default for RowCursor {
    fn default() -> Self {
        RowCursor {
            data_row: FIRST_DATA_ROW,
            header_written: false,
        }
    }
}

/// Writes the configured cells of one table per call.
pub struct MappingEngine {
    sections: Vec<ResolvedSection>,
    /// Extraction mode for data values; header labels are always clean
    value_mode: TextMode,
}

impl MappingEngine {
    pub fn new(config: &MappingConfig, value_mode: TextMode) -> Result<Self, Docx2XlsxError> {
        Ok(MappingEngine {
            sections: config.resolve()?,
            value_mode,
        })
    }

    /// Maps one table into the sink and advances the cursor.
    ///
    /// Returns whether this call wrote the header row.
    pub fn apply<R, S>(&self, table: &R, sink: &mut S, cursor: &mut RowCursor) -> Result<bool, Docx2XlsxError>
    where
        R: CellReader + ?Sized,
        S: OutputSink + ?Sized,
    {
        let write_header = !cursor.header_written;
        for section in &self.sections {
            if write_header {
                write_row(table, sink, section, &section.keys, HEADER_ROW, TextMode::Clean)?;
            }
            write_row(table, sink, section, &section.values, cursor.data_row, self.value_mode)?;
        }
        cursor.header_written = true;
        cursor.data_row += 1;
        Ok(write_header)
    }
}

/// Copies the source cells `columns` of the section row to consecutive columns of `row`.
fn write_row<R, S>(
    table: &R,
    sink: &mut S,
    section: &ResolvedSection,
    columns: &[usize],
    row: u32,
    mode: TextMode,
) -> Result<(), Docx2XlsxError>
where
    R: CellReader + ?Sized,
    S: OutputSink + ?Sized,
{
    for (offset, source) in columns.iter().enumerate() {
        // Bounded by `Section::resolve`
        let col = section.col_start + offset as u16;
        let text = mode.read(table, section.row, *source)?;
        debug!(section = section.name.as_str(), source_row = section.row, source_col = *source, row, col, "Write cell");
        sink.write_cell(row, col, &text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentError;
    use crate::document::Table;
    use crate::testutil::RecordingSink;

    fn form(name: &str, age: &str) -> Table {
        let rows = [
            vec!["Personnel form", "", "", ""],
            vec!["姓名", "", "", ""],
            vec!["label", " 姓 名 ", "年 龄", "备注"],
            vec!["", name, age, "n/a"],
        ];
        Table::new(
            "form.docx",
            rows.iter()
                .map(|row| row.iter().map(|text| text.to_string()).collect())
                .collect(),
        )
    }

    fn engine(json: &str, mode: TextMode) -> MappingEngine {
        MappingEngine::new(&MappingConfig::from_json(json).unwrap(), mode).unwrap()
    }

    const HEADER_AND_VALUES: &str = r#"{
        "labels": {"row": 2, "from": {"col": "1~3", "key": "1,2", "val": "1,2"}, "to": {"col_start": 0}},
        "details": {"row": 3, "from": {"col": "1~3", "key": "3", "val": "1,+1"}, "to": {"col_start": 4}}
    }"#;

    #[test]
    fn first_document_writes_header_and_values() {
        let engine = engine(HEADER_AND_VALUES, TextMode::Raw);
        let mut sink = RecordingSink::default();
        let mut cursor = RowCursor::default();

        let wrote_header = engine.apply(&form("Alice", "30"), &mut sink, &mut cursor).unwrap();

        assert!(wrote_header);
        assert_eq!(sink.row(HEADER_ROW), vec![(0, "姓名"), (1, "年龄"), (4, "n/a")]);
        assert_eq!(
            sink.row(FIRST_DATA_ROW),
            vec![(0, " 姓 名 "), (1, "年 龄"), (4, "Alice"), (5, "30"), (6, "n/a")]
        );
        assert_eq!(cursor, RowCursor { data_row: 3, header_written: true });
    }

    #[test]
    fn header_is_written_once_per_run() {
        let engine = engine(HEADER_AND_VALUES, TextMode::Raw);
        let mut sink = RecordingSink::default();
        let mut cursor = RowCursor::default();

        engine.apply(&form("Alice", "30"), &mut sink, &mut cursor).unwrap();
        let writes = sink.writes;
        let wrote_header = engine.apply(&form("Bob", "41"), &mut sink, &mut cursor).unwrap();

        assert!(!wrote_header);
        assert_eq!(sink.writes - writes, 5);
        assert_eq!(sink.get(3, 4), Some("Bob"));
        assert_eq!(sink.get(3, 5), Some("41"));
        assert_eq!(cursor.data_row, 4);
    }

    #[test]
    fn clean_value_mode() {
        let engine = engine(HEADER_AND_VALUES, TextMode::Clean);
        let mut sink = RecordingSink::default();
        let mut cursor = RowCursor::default();

        engine.apply(&form(" Al ice ", "30"), &mut sink, &mut cursor).unwrap();

        assert_eq!(sink.get(FIRST_DATA_ROW, 0), Some("姓名"));
        assert_eq!(sink.get(FIRST_DATA_ROW, 4), Some("Alice"));
    }

    #[test]
    fn cell_counts_follow_ranges() {
        let json = r#"{"s": {"row": 2, "from": {"col": "0~3", "key": "0,+2", "val": "3,2,1,0"}, "to": {"col_start": 10}}}"#;
        let engine = engine(json, TextMode::Raw);
        let mut sink = RecordingSink::default();
        let mut cursor = RowCursor::default();

        engine.apply(&form("Alice", "30"), &mut sink, &mut cursor).unwrap();

        let header: Vec<u16> = sink.row(HEADER_ROW).into_iter().map(|(col, _)| col).collect();
        let data: Vec<u16> = sink.row(FIRST_DATA_ROW).into_iter().map(|(col, _)| col).collect();
        assert_eq!(header, vec![10, 11]);
        assert_eq!(data, vec![10, 11, 12, 13]);
        assert_eq!(sink.get(FIRST_DATA_ROW, 10), Some("备注"));
    }

    #[test]
    fn reading_outside_table_fails() {
        let json = r#"{"s": {"row": 9, "from": {"col": "1", "key": "1", "val": "1"}, "to": {"col_start": 0}}}"#;
        let engine = engine(json, TextMode::Raw);
        let mut sink = RecordingSink::default();
        let mut cursor = RowCursor::default();

        let result = engine.apply(&form("Alice", "30"), &mut sink, &mut cursor);

        assert!(matches!(
            result,
            Err(Docx2XlsxError::DocumentError(DocumentError::CellOutOfRange { row: 9, col: 1, .. }))
        ));
        assert_eq!(cursor, RowCursor::default());
    }

    #[test]
    fn empty_configuration_only_advances() {
        let engine = engine("{}", TextMode::Raw);
        let mut sink = RecordingSink::default();
        let mut cursor = RowCursor::default();

        engine.apply(&form("Alice", "30"), &mut sink, &mut cursor).unwrap();

        assert_eq!(sink.writes, 0);
        assert_eq!(cursor.data_row, FIRST_DATA_ROW + 1);
        assert!(engine.sections.is_empty());
    }
}
