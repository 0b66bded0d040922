//! In-memory and placeholder dataset backends

use std::collections::BTreeSet;

use super::{filter_rows, DatasetError, DatasetRow, HistoricalDataset, RowFilter};

/// Dataset held entirely in memory, built row by row.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    rows: Vec<DatasetRow>,
    columns: BTreeSet<String>,
}

impl InMemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(mut self, row: DatasetRow) -> Self {
        self.push(row);
        self
    }

    pub fn push(&mut self, row: DatasetRow) {
        self.columns.extend(row.columns().map(str::to_string));
        if row.element_materials.is_some() {
            self.columns.insert("element_materials_string".to_string());
        }
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<DatasetRow> for InMemoryDataset {
    fn from_iter<I: IntoIterator<Item = DatasetRow>>(iter: I) -> Self {
        let mut dataset = Self::new();
        for row in iter {
            dataset.push(row);
        }
        dataset
    }
}

impl HistoricalDataset for InMemoryDataset {
    fn query(&self, filter: &RowFilter) -> Result<Vec<DatasetRow>, DatasetError> {
        Ok(filter_rows(&self.rows, filter))
    }

    fn has_column(&self, column: &str) -> bool {
        self.columns.contains(column)
    }
}

/// Stand-in for hosts without a dataset. Every query reports
/// `DatasetError::Unavailable`, which the engine treats as zero rows.
#[derive(Debug, Clone)]
pub struct UnavailableDataset {
    reason: String,
}

impl UnavailableDataset {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableDataset {
    fn default() -> Self {
        Self::new("no historical dataset configured")
    }
}

impl HistoricalDataset for UnavailableDataset {
    fn query(&self, _filter: &RowFilter) -> Result<Vec<DatasetRow>, DatasetError> {
        Err(DatasetError::Unavailable(self.reason.clone()))
    }

    fn has_column(&self, _column: &str) -> bool {
        false
    }
}
