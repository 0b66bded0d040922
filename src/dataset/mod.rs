//! Historical Dataset Index
//!
//! Read-only repository of previously computed or measured configurations.
//! The engine only ever asks one question, "which rows match this filter",
//! so storage technology stays behind the `HistoricalDataset` trait:
//!
//! - `CsvDataset`: loaded once from a CSV export
//! - `InMemoryDataset`: built in code (tests, embedding)
//! - `UnavailableDataset`: no dataset configured; every query fails
//!
//! Matching is always done on normalized keys (lowercase, spaces and
//! hyphens stripped), shared by every backend through `RowFilter::matches`.

mod csv_store;
mod memory;

pub use csv_store::{clean_column_name, ColumnCleaner, CsvDataset};
pub use memory::{InMemoryDataset, UnavailableDataset};

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::normalize::normalize_key;

/// Dataset access errors.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset {} has no '{column}' column", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Dataset {} contains no rows", .0.display())]
    Empty(PathBuf),

    #[error("Invalid column-cleaning pattern: {0}")]
    Pattern(#[from] regex::Error),
}

// ============================================================================
// Rows
// ============================================================================

/// One historical configuration.
///
/// Categorical keys are kept both raw and normalized; every other cell is
/// kept as raw text keyed by its cleaned column name and parsed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub apartment_type: String,
    pub zone: String,
    pub element_materials: Option<String>,
    apartment_key: String,
    zone_key: String,
    element_key: Option<String>,
    cells: BTreeMap<String, String>,
}

impl DatasetRow {
    pub fn new(apartment_type: impl Into<String>, zone: impl Into<String>) -> Self {
        let apartment_type = apartment_type.into();
        let zone = zone.into();
        Self {
            apartment_key: normalize_key(&apartment_type),
            zone_key: normalize_key(&zone),
            apartment_type,
            zone,
            element_materials: None,
            element_key: None,
            cells: BTreeMap::new(),
        }
    }

    pub fn with_element_materials(mut self, element: impl Into<String>) -> Self {
        let element = element.into();
        self.element_key = Some(normalize_key(&element));
        self.element_materials = Some(element);
        self
    }

    /// Add a raw cell. The column name must already be cleaned.
    pub fn with_cell(mut self, column: impl Into<String>, raw: impl Into<String>) -> Self {
        self.cells.insert(column.into(), raw.into());
        self
    }

    /// Add a numeric cell.
    pub fn with_value(self, column: impl Into<String>, value: f64) -> Self {
        self.with_cell(column, value.to_string())
    }

    /// Parsed numeric cell. Missing, blank, "nan"/"null"/"-" and unparseable
    /// cells are all `None`, as are non-finite numbers.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        let raw = self.cells.get(column)?.trim();
        if raw.is_empty()
            || raw.eq_ignore_ascii_case("nan")
            || raw.eq_ignore_ascii_case("null")
            || raw == "-"
        {
            return None;
        }
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    pub fn has_cell(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Row selection used by the inference tiers and the dataset-first lookup.
///
/// Construct with the helper functions so that keys are normalized once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    /// Normalized apartment type and zone equal (and element materials, when given)
    Exact {
        apartment_type: String,
        zone: String,
        element_materials: Option<String>,
    },
    /// Normalized row values contain both inputs as substrings
    Contains { apartment_type: String, zone: String },
    /// Zone ignored; row apartment type contains the input
    ApartmentContains { apartment_type: String },
}

impl RowFilter {
    pub fn exact(apartment_type: &str, zone: &str) -> Self {
        RowFilter::Exact {
            apartment_type: normalize_key(apartment_type),
            zone: normalize_key(zone),
            element_materials: None,
        }
    }

    pub fn exact_with_element(apartment_type: &str, zone: &str, element: &str) -> Self {
        RowFilter::Exact {
            apartment_type: normalize_key(apartment_type),
            zone: normalize_key(zone),
            element_materials: Some(normalize_key(element)),
        }
    }

    pub fn contains(apartment_type: &str, zone: &str) -> Self {
        RowFilter::Contains {
            apartment_type: normalize_key(apartment_type),
            zone: normalize_key(zone),
        }
    }

    pub fn apartment_contains(apartment_type: &str) -> Self {
        RowFilter::ApartmentContains {
            apartment_type: normalize_key(apartment_type),
        }
    }

    pub fn matches(&self, row: &DatasetRow) -> bool {
        match self {
            RowFilter::Exact {
                apartment_type,
                zone,
                element_materials,
            } => {
                row.apartment_key == *apartment_type
                    && row.zone_key == *zone
                    && match element_materials {
                        Some(element) => row.element_key.as_deref() == Some(element.as_str()),
                        None => true,
                    }
            }
            RowFilter::Contains {
                apartment_type,
                zone,
            } => row.apartment_key.contains(apartment_type.as_str()) && row.zone_key.contains(zone.as_str()),
            RowFilter::ApartmentContains { apartment_type } => {
                row.apartment_key.contains(apartment_type.as_str())
            }
        }
    }
}

/// Clone every row the filter accepts, in storage order.
pub(crate) fn filter_rows(rows: &[DatasetRow], filter: &RowFilter) -> Vec<DatasetRow> {
    rows.iter().filter(|r| filter.matches(r)).cloned().collect()
}

// ============================================================================
// Repository Trait
// ============================================================================

/// Read-only historical dataset.
///
/// Implementations must be safe for concurrent reads; the engine never writes.
pub trait HistoricalDataset: Send + Sync {
    /// All rows accepted by `filter`, in storage order.
    fn query(&self, filter: &RowFilter) -> Result<Vec<DatasetRow>, DatasetError>;

    /// Whether the store carries a column with this cleaned name.
    fn has_column(&self, column: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(apt: &str, zone: &str) -> DatasetRow {
        DatasetRow::new(apt, zone)
    }

    #[test]
    fn test_exact_filter_ignores_case_spaces_and_hyphens() {
        let row = make_row("2Bed", "Roadside-V1");
        assert!(RowFilter::exact("2 bed", "roadside v1").matches(&row));
        assert!(!RowFilter::exact("2Bed", "Roadside-V2").matches(&row));
    }

    #[test]
    fn test_exact_filter_with_element_requires_element_match() {
        let row = make_row("1Bed", "HD-Urban-V0").with_element_materials("Wall: Gypsum Board");
        assert!(RowFilter::exact_with_element("1Bed", "HD-Urban-V0", "wall:gypsumboard").matches(&row));
        assert!(!RowFilter::exact_with_element("1Bed", "HD-Urban-V0", "Wall: Concrete").matches(&row));
        let bare = make_row("1Bed", "HD-Urban-V0");
        assert!(!RowFilter::exact_with_element("1Bed", "HD-Urban-V0", "Wall: Gypsum Board").matches(&bare));
    }

    #[test]
    fn test_contains_filter_matches_substrings() {
        let row = make_row("2Bed-Duplex", "Roadside-V1-North");
        assert!(RowFilter::contains("2Bed", "Roadside-V1").matches(&row));
        assert!(!RowFilter::exact("2Bed", "Roadside-V1").matches(&row));
        assert!(RowFilter::apartment_contains("2bed").matches(&row));
        assert!(!RowFilter::apartment_contains("3Bed").matches(&row));
    }

    #[test]
    fn test_numeric_cells_skip_malformed_values() {
        let row = make_row("1Bed", "Z")
            .with_cell("laeq_db", " 52.5 ")
            .with_cell("rt60_s", "n/a")
            .with_cell("spl_db", "NaN")
            .with_cell("barrier_height_m", "inf")
            .with_cell("barrier_distance_m", "");
        assert_eq!(row.numeric("laeq_db"), Some(52.5));
        assert_eq!(row.numeric("rt60_s"), None);
        assert_eq!(row.numeric("spl_db"), None);
        assert_eq!(row.numeric("barrier_height_m"), None);
        assert_eq!(row.numeric("barrier_distance_m"), None);
        assert_eq!(row.numeric("missing"), None);
    }
}
