//! Section-based mapping configuration.
//!
//! The configuration file is a JSON object whose keys name sections and whose
//! values describe one source row and the destination columns it fills:
//!
//! ```json
//! {
//!   "name_block": {
//!     "row": 2,
//!     "from": {"col": "1~4", "key": "1,2", "val": "1,2"},
//!     "to": {"col_start": 0}
//!   }
//! }
//! ```
//!
//! Sections keep their declaration order.

use crate::error::Docx2XlsxError;
use crate::error::ResultMessage;
use crate::mapping::range::parse_range;
use crate::workbook::MAX_COLUMNS;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

/// Errors in the content of a mapping configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("end required for open-ended range '{0}'")]
    OpenRangeWithoutEnd(String),

    #[error("Section '{section}' writes past the last spreadsheet column")]
    ColumnOverflowError { section: String },
}

/// A range expression as written in the configuration, either `"1~3"` or a bare `3`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "RawRange")]
pub struct RangeExpression(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRange {
    Text(String),
    Number(u64),
}

impl From<RawRange> for RangeExpression {
    fn from(value: RawRange) -> Self {
        match value {
            RawRange::Text(text) => RangeExpression(text),
            RawRange::Number(number) => RangeExpression(number.to_string()),
        }
    }
}

impl RangeExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Source columns of a section.
#[derive(Clone, Debug, Deserialize)]
pub struct SourceColumns {
    /// Span of the section; its last index bounds open-ended `key`/`val` ranges
    pub col: RangeExpression,
    /// Columns whose text becomes header labels
    pub key: RangeExpression,
    /// Columns whose text becomes data values
    pub val: RangeExpression,
}

/// Destination of a section.
#[derive(Clone, Debug, Deserialize)]
pub struct Destination {
    /// First spreadsheet column written by both header and data
    pub col_start: u16,
}

/// One named mapping rule.
#[derive(Clone, Debug, Deserialize)]
pub struct Section {
    /// Source row inside the located table
    pub row: usize,
    pub from: SourceColumns,
    pub to: Destination,
}

/// A section with its range expressions expanded to column indexes.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSection {
    pub name: String,
    pub row: usize,
    pub keys: Vec<usize>,
    pub values: Vec<usize>,
    pub col_start: u16,
}

impl Section {
    /// Expands `col`, `key` and `val`; the last index of `col` is the `end` of open-ended ranges.
    pub fn resolve(&self, name: &str) -> Result<ResolvedSection, Docx2XlsxError> {
        let cols = parse_range(self.from.col.as_str(), None)?;
        let end = cols.last().copied();
        let keys = parse_range(self.from.key.as_str(), end)?;
        let values = parse_range(self.from.val.as_str(), end)?;

        let widest = keys.len().max(values.len());
        if widest > 0 && usize::from(self.to.col_start) + widest > MAX_COLUMNS {
            Err(ConfigError::ColumnOverflowError { section: name.to_owned() })?;
        }

        debug!(section = name, row = self.row, ?keys, ?values, col_start = self.to.col_start, "Resolved section");
        Ok(ResolvedSection {
            name: name.to_owned(),
            row: self.row,
            keys,
            values,
            col_start: self.to.col_start,
        })
    }
}

/// Mapping from section name to section, in declaration order.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct MappingConfig {
    sections: IndexMap<String, Section>,
}

impl MappingConfig {
    /// Loads and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Docx2XlsxError> {
        let path = path.as_ref();
        let prefix = format!("Load config '{}'", path.display());
        let file = File::open(path).map_err(Docx2XlsxError::from).with_prefix(&prefix)?;
        let config: MappingConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(Docx2XlsxError::from)
            .with_prefix(&prefix)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, Docx2XlsxError> {
        let config: MappingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves every section once so malformed ranges surface before any document is read.
    pub fn validate(&self) -> Result<(), Docx2XlsxError> {
        if self.sections.is_empty() {
            warn!("Mapping configuration has no sections");
        }
        self.resolve().map(|_| ())
    }

    /// Resolves all sections in declaration order.
    pub fn resolve(&self) -> Result<Vec<ResolvedSection>, Docx2XlsxError> {
        self.sections
            .iter()
            .map(|(name, section)| section.resolve(name))
            .collect()
    }
}
