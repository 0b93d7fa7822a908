//! Fixtures shared by unit tests: in-memory `.docx` packages and a sink that
//! records every cell write.

use crate::error::Docx2XlsxError;
use crate::workbook::OutputSink;
use quick_xml::escape::escape;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use zip::write::SimpleFileOptions;
use zip::ZipArchive;
use zip::ZipWriter;

/// Wraps body content into a complete main document part.
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
}

/// Builds a plain table, one paragraph per cell.
pub fn table_xml(rows: &[&[&str]]) -> String {
    let mut xml = String::from("<w:tbl>");
    for row in rows {
        xml.push_str("<w:tr>");
        for text in *row {
            xml.push_str(&format!(
                r#"<w:tc><w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p></w:tc>"#,
                escape(*text)
            ));
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

/// Serialises a `.docx` package holding `document` as its main part.
pub fn docx_bytes(document: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer
        .write_all(br#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

pub fn docx_archive(document: &str) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(docx_bytes(document))).unwrap()
}

/// Writes a `.docx` whose body is the given tables.
pub fn write_docx(dir: &Path, file_name: &str, tables: &[&[&[&str]]]) -> PathBuf {
    let body: String = tables.iter().map(|rows| table_xml(rows)).collect();
    let path = dir.join(file_name);
    std::fs::write(&path, docx_bytes(&document_xml(&body))).unwrap();
    path
}

/// Sink keeping every write in memory, keyed by `(row, col)`.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub cells: BTreeMap<(u32, u16), String>,
    pub writes: usize,
}

impl RecordingSink {
    pub fn get(&self, row: u32, col: u16) -> Option<&str> {
        self.cells.get(&(row, col)).map(String::as_str)
    }

    /// Cells of one row in column order
    pub fn row(&self, row: u32) -> Vec<(u16, &str)> {
        self.cells
            .range((row, 0)..=(row, u16::MAX))
            .map(|((_, col), text)| (*col, text.as_str()))
            .collect()
    }
}

impl OutputSink for RecordingSink {
    fn write_cell(&mut self, row: u32, col: u16, text: &str) -> Result<(), Docx2XlsxError> {
        self.cells.insert((row, col), text.to_owned());
        self.writes += 1;
        Ok(())
    }

    fn close(self) -> Result<(), Docx2XlsxError> {
        Ok(())
    }
}
