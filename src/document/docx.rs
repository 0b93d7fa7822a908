use crate::document::Document;
use crate::document::DocumentError;
use crate::document::Table;
use crate::error::Docx2XlsxError;
use crate::error::ResultMessage;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Package relationships part
const PACKAGE_RELATIONSHIPS: &str = "_rels/.rels";
/// Main document part used when the package relationships do not name one
const DEFAULT_MAIN_PART: &str = "word/document.xml";
/// Relationship type suffix of the main document part
const OFFICE_DOCUMENT: &str = "/officeDocument";

// XML tag names for parsing WordprocessingML
const TAG_RELATIONSHIP: &[u8] = b"Relationship";
const TAG_TABLE: QName = QName(b"w:tbl");               // Table
const TAG_ROW: QName = QName(b"w:tr");                  // Table row
const TAG_CELL: QName = QName(b"w:tc");                 // Table cell
const TAG_GRID_SPAN: QName = QName(b"w:gridSpan");      // Horizontal merge width
const TAG_VERTICAL_MERGE: QName = QName(b"w:vMerge");   // Vertical merge marker
const TAG_PARAGRAPH: QName = QName(b"w:p");             // Paragraph
const TAG_RUN: QName = QName(b"w:r");                   // Run of text
const TAG_TEXT: QName = QName(b"w:t");                  // Text content within runs
const TAG_TAB: QName = QName(b"w:tab");                 // Tab character within runs
const TAG_BREAK: QName = QName(b"w:br");                // Line break within runs
const TAG_CARRIAGE_RETURN: QName = QName(b"w:cr");      // Carriage return within runs
const TAG_TEXT_BOX: QName = QName(b"w:txbxContent");    // Text box content, not cell text

/// A `.docx` document reduced to its top-level tables
pub struct DocxDocument {
    /// File name of the document
    pub(crate) name: String,
    tables: Vec<Table>,
}

impl DocxDocument {
    /// Opens a `.docx` file and reads all of its top-level tables
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Docx2XlsxError> {
        let name = path.as_ref().display().to_string();
        let prefix = format!("Read docx '{}'", name);
        let file = File::open(path.as_ref())
            .map_err(Docx2XlsxError::from)
            .with_prefix(&prefix)?;
        let mut zip = ZipArchive::new(BufReader::new(file))
            .map_err(Docx2XlsxError::from)
            .with_prefix(&prefix)?;
        Self::from_archive(&name, &mut zip)
    }

    /// Reads the tables from an already opened package
    pub(crate) fn from_archive<RS: Read + Seek>(name: &str, zip: &mut ZipArchive<RS>) -> Result<Self, Docx2XlsxError> {
        let part = main_part(zip)?;
        let mut reader = zip.xml_reader(&part)?.ok_or_else(|| DocumentError::MissingPart {
            name: name.to_owned(),
            part: part.to_owned(),
        })?;
        let tables = read_tables(name, &mut reader)?;
        debug!(document = name, part = part.as_str(), tables = tables.len(), "Read docx tables");
        Ok(DocxDocument {
            name: name.to_owned(),
            tables,
        })
    }
}

impl Document for DocxDocument {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn tables(&self) -> &[Table] {
        &self.tables
    }
}

/// Finds the main document part through the package relationships
fn main_part<RS: Read + Seek>(zip: &mut ZipArchive<RS>) -> Result<String, Docx2XlsxError> {
    let mut reader = match zip.xml_reader(PACKAGE_RELATIONSHIPS)? {
        Some(reader) => reader,
        None => return Ok(DEFAULT_MAIN_PART.to_owned()),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            if let Some((kind, target)) = kind.zip(target) {
                if kind.ends_with(OFFICE_DOCUMENT) {
                    return Ok(target.trim_start_matches('/').to_owned());
                }
            }
        }
    });
    Ok(DEFAULT_MAIN_PART.to_owned())
}

/// One `w:tc` as written, before merges are expanded
#[derive(Debug)]
struct CellInfo {
    paragraphs: Vec<String>,
    /// Grid columns covered, from w:gridSpan
    grid_span: usize,
    /// None: not merged, Some(true): restart, Some(false): continue
    v_merge: Option<bool>,
}

impl CellInfo {
    fn new() -> Self {
        CellInfo {
            paragraphs: Vec::new(),
            grid_span: 1,
            v_merge: None,
        }
    }

    fn text(&self) -> String {
        self.paragraphs.join("\n")
    }

    fn paragraph(&mut self) -> &mut String {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(String::new());
        }
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }
}

/// Lays rows of cells out on the column grid.
///
/// A cell spanning `n` grid columns answers for all of them. A vertical merge
/// continuation answers with the text of the cell above at the same grid column.
fn expand_grid(rows: Vec<Vec<CellInfo>>) -> Vec<Vec<String>> {
    let mut grid = Vec::<Vec<String>>::with_capacity(rows.len());
    for cells in rows {
        let mut record = Vec::<String>::new();
        for cell in cells {
            let text = cell.text();
            for _ in 0..cell.grid_span {
                let value = match cell.v_merge {
                    Some(false) => grid
                        .last()
                        .and_then(|above| above.get(record.len()))
                        .cloned()
                        .unwrap_or_default(),
                    _ => text.to_owned(),
                };
                record.push(value);
            }
        }
        grid.push(record);
    }
    grid
}

/// Reads every top-level table of a main document part.
///
/// Nested tables are skipped together with their text.
fn read_tables<R: BufRead>(name: &str, reader: &mut XmlReader<R>) -> Result<Vec<Table>, Docx2XlsxError> {
    let mut tables = Vec::<Table>::new();
    let mut rows = Vec::<Vec<CellInfo>>::new();
    let mut row = Vec::<CellInfo>::new();
    let mut cell: Option<CellInfo> = None;
    // Context
    let mut depth = 0usize;
    let mut text_box = 0usize;
    let mut in_run = false;
    let mut in_text = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_TABLE => {
            depth += 1;
            if depth == 1 {
                rows.clear();
            }
        }
        Event::End(event) if event.name() == TAG_TABLE => {
            if depth == 1 {
                tables.push(Table::new(name, expand_grid(std::mem::take(&mut rows))));
            }
            depth = depth.saturating_sub(1);
        }
        Event::Start(event) if depth == 1 && event.name() == TAG_ROW => row.clear(),
        Event::End(event) if depth == 1 && event.name() == TAG_ROW => rows.push(std::mem::take(&mut row)),
        Event::Start(event) if depth == 1 && event.name() == TAG_CELL => cell = Some(CellInfo::new()),
        Event::End(event) if depth == 1 && event.name() == TAG_CELL => {
            if let Some(cell) = cell.take() {
                row.push(cell);
            }
        }
        Event::Start(event) if depth == 1 && event.name() == TAG_GRID_SPAN => {
            if let Some(cell) = cell.as_mut() {
                cell.grid_span = event.parse_attribute_value::<usize>("w:val")?.unwrap_or(1).max(1);
            }
        }
        Event::Start(event) if depth == 1 && event.name() == TAG_VERTICAL_MERGE => {
            let restart = event
                .get_attribute_value("w:val")?
                .map(|value| value == "restart")
                .unwrap_or(false);
            if let Some(cell) = cell.as_mut() {
                cell.v_merge = Some(restart);
            }
        }
        Event::Start(event) if event.name() == TAG_TEXT_BOX => text_box += 1,
        Event::End(event) if event.name() == TAG_TEXT_BOX => text_box = text_box.saturating_sub(1),
        // Reading cell text
        Event::Start(event) if depth == 1 && text_box == 0 && event.name() == TAG_PARAGRAPH => {
            if let Some(cell) = cell.as_mut() {
                cell.paragraphs.push(String::new());
            }
        }
        Event::Start(event) if event.name() == TAG_RUN => in_run = true,
        Event::End(event) if event.name() == TAG_RUN => in_run = false,
        Event::Start(event) if event.name() == TAG_TEXT => in_text = true,
        Event::End(event) if event.name() == TAG_TEXT => in_text = false,
        Event::Start(event) if depth == 1 && text_box == 0 && in_run && event.name() == TAG_TAB => {
            if let Some(cell) = cell.as_mut() {
                cell.paragraph().push('\t');
            }
        }
        Event::Start(event) if depth == 1 && text_box == 0 && in_run && (event.name() == TAG_BREAK || event.name() == TAG_CARRIAGE_RETURN) => {
            if let Some(cell) = cell.as_mut() {
                cell.paragraph().push('\n');
            }
        }
        Event::Text(event) if depth == 1 && text_box == 0 && in_text => {
            if let Some(cell) = cell.as_mut() {
                cell.paragraph().push_bytes_text(&event)?;
            }
        }
        Event::GeneralRef(event) if depth == 1 && text_box == 0 && in_text => {
            if let Some(cell) = cell.as_mut() {
                cell.paragraph().push_bytes_ref(&event)?;
            }
        }
    });
    Ok(tables)
}
