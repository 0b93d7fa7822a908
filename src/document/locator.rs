use crate::document::text::clean_text;
use crate::document::Table;

/// Marker label expected in the probe cell, "Name"
pub const DEFAULT_MARKER: &str = "姓名";
/// Row of the probe cell
pub const PROBE_ROW: usize = 1;
/// Column of the probe cell
pub const PROBE_COL: usize = 0;

/// Returns the first table whose probe cell, with whitespace removed, equals `marker`.
///
/// A table too small to have a probe cell does not match.
pub fn locate<'a>(tables: &'a [Table], marker: &str) -> Option<&'a Table> {
    tables.iter().find(|table| {
        table
            .get(PROBE_ROW, PROBE_COL)
            .map(|text| clean_text(text) == marker)
            .unwrap_or(false)
    })
}
