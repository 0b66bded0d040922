//! CSV-backed historical dataset
//!
//! Loads the exported dataset once at startup. Header names are cleaned the
//! same way every export has been cleaned ("Floor Height (m)" becomes
//! `floor_height_m`, "Unnamed: 20" becomes `unnamed_20`), so rows can be
//! queried by predictor column name.

use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{filter_rows, DatasetError, DatasetRow, HistoricalDataset, RowFilter};

/// Column names accepted for the apartment type, first match wins.
const APARTMENT_COLUMNS: &[&str] = &["apartment_type_string", "apartment_type"];
/// Column names accepted for the zone, first match wins.
const ZONE_COLUMNS: &[&str] = &["zone_string", "zone"];
/// Column names accepted for the element description, first match wins.
const ELEMENT_COLUMNS: &[&str] = &["element_materials_string", "element_materials"];

/// Maximum malformed-row warnings logged per file.
const MAX_ROW_WARNINGS: usize = 10;

// ============================================================================
// Column Cleaning
// ============================================================================

/// Header-name cleaner: trim, lowercase, whitespace/colon runs to `_`,
/// parentheses dropped, repeated underscores collapsed, `ç` to `c`.
#[derive(Debug, Clone)]
pub struct ColumnCleaner {
    separators: Regex,
    parentheses: Regex,
    repeats: Regex,
}

impl ColumnCleaner {
    pub fn new() -> Result<Self, DatasetError> {
        Ok(Self {
            separators: Regex::new(r"[\s:]+")?,
            parentheses: Regex::new(r"[()]")?,
            repeats: Regex::new(r"__+")?,
        })
    }

    pub fn clean(&self, name: &str) -> String {
        let lowered = name.trim().trim_start_matches('\u{feff}').to_lowercase();
        let separated = self.separators.replace_all(&lowered, "_");
        let bare = self.parentheses.replace_all(&separated, "");
        self.repeats.replace_all(&bare, "_").replace('ç', "c")
    }
}

/// Clean a single header name. Prefer a shared `ColumnCleaner` in loops.
pub fn clean_column_name(name: &str) -> Result<String, DatasetError> {
    Ok(ColumnCleaner::new()?.clean(name))
}

// ============================================================================
// CSV Parsing
// ============================================================================

/// Split a CSV line into fields, honouring quoted fields and `""` escapes.
fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Decode one raw line. Bytes that are not UTF-8 are read as Latin-1, the
/// encoding older spreadsheet exports use for headers like "Façade".
fn decode_line(bytes: &[u8]) -> (String, bool) {
    let trimmed = bytes
        .strip_suffix(b"\n")
        .map_or(bytes, |b| b.strip_suffix(b"\r").unwrap_or(b));
    match std::str::from_utf8(trimmed) {
        Ok(text) => (text.to_string(), false),
        Err(_) => (trimmed.iter().map(|&b| char::from(b)).collect(), true),
    }
}

/// Next line from `reader`, or `None` at end of input.
fn read_line(
    reader: &mut impl BufRead,
    buf: &mut Vec<u8>,
    path: &Path,
) -> Result<Option<(String, bool)>, DatasetError> {
    buf.clear();
    let read = reader.read_until(b'\n', buf).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((read > 0).then(|| decode_line(buf)))
}

fn find_column(columns: &[String], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|wanted| columns.iter().position(|c| c == wanted))
}

// ============================================================================
// Dataset
// ============================================================================

/// Immutable in-memory copy of a CSV dataset.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    path: PathBuf,
    columns: Vec<String>,
    rows: Vec<DatasetRow>,
}

impl CsvDataset {
    /// Load and index a CSV file.
    ///
    /// Fails if the file cannot be read, lacks an apartment-type or zone
    /// column, or has no data rows. Rows with the wrong field count are kept
    /// (missing cells read as absent) and logged.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| DatasetError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_reader(path, BufReader::new(file))
    }

    /// Load from any buffered reader; `path` is only used in errors and logs.
    ///
    /// Lines that are not valid UTF-8 are decoded as Latin-1 and counted,
    /// never rejected.
    pub fn from_reader(path: PathBuf, mut reader: impl BufRead) -> Result<Self, DatasetError> {
        let cleaner = ColumnCleaner::new()?;
        let mut buf = Vec::new();
        let mut latin1 = 0usize;

        let header = match read_line(&mut reader, &mut buf, &path)? {
            Some((line, was_latin1)) => {
                latin1 += usize::from(was_latin1);
                line
            }
            None => return Err(DatasetError::Empty(path)),
        };
        let columns: Vec<String> = csv_split(&header).iter().map(|c| cleaner.clean(c)).collect();

        let apartment_idx = find_column(&columns, APARTMENT_COLUMNS).ok_or_else(|| {
            DatasetError::MissingColumn {
                path: path.clone(),
                column: APARTMENT_COLUMNS[0].to_string(),
            }
        })?;
        let zone_idx = find_column(&columns, ZONE_COLUMNS).ok_or_else(|| DatasetError::MissingColumn {
            path: path.clone(),
            column: ZONE_COLUMNS[0].to_string(),
        })?;
        let element_idx = find_column(&columns, ELEMENT_COLUMNS);

        let mut rows = Vec::new();
        let mut malformed = 0usize;
        let mut line_num = 1usize;

        while let Some((line, was_latin1)) = read_line(&mut reader, &mut buf, &path)? {
            line_num += 1;
            if was_latin1 {
                if latin1 < MAX_ROW_WARNINGS {
                    warn!(
                        file = %path.display(),
                        line = line_num,
                        "Dataset row is not UTF-8, decoded as Latin-1"
                    );
                }
                latin1 += 1;
            }
            if line.trim().is_empty() {
                continue;
            }

            let fields = csv_split(&line);
            if fields.len() != columns.len() {
                if malformed < MAX_ROW_WARNINGS {
                    warn!(
                        file = %path.display(),
                        line = line_num,
                        expected = columns.len(),
                        found = fields.len(),
                        "Dataset row has wrong field count"
                    );
                }
                malformed += 1;
            }

            let cell = |idx: usize| fields.get(idx).map(|s| s.trim()).unwrap_or("");
            let mut row = DatasetRow::new(cell(apartment_idx), cell(zone_idx));
            if let Some(idx) = element_idx {
                if !cell(idx).is_empty() {
                    row = row.with_element_materials(cell(idx));
                }
            }
            for (idx, column) in columns.iter().enumerate() {
                if idx == apartment_idx || idx == zone_idx || Some(idx) == element_idx {
                    continue;
                }
                row = row.with_cell(column.as_str(), cell(idx));
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(DatasetError::Empty(path));
        }

        info!(
            file = %path.display(),
            rows = rows.len(),
            columns = columns.len(),
            malformed,
            latin1,
            "Historical dataset loaded"
        );
        debug!(columns = ?columns, "Dataset columns");

        Ok(Self {
            path,
            columns,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl HistoricalDataset for CsvDataset {
    fn query(&self, filter: &RowFilter) -> Result<Vec<DatasetRow>, DatasetError> {
        Ok(filter_rows(&self.rows, filter))
    }

    fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}
