//! Column-mean aggregation over matched dataset rows
//!
//! Shared by every dataset tier. Each numeric predictor column becomes the
//! mean of its parseable cells; malformed or missing cells are skipped, and
//! a column with no parseable cell keeps the value already in the vector.

use statrs::statistics::Statistics;

use crate::dataset::DatasetRow;
use crate::types::{FeatureVector, NumericColumn};

/// What one aggregation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationReport {
    /// Columns that received a mean
    pub columns_filled: usize,
    /// Cells present in a row but not parseable as a finite number
    pub cells_skipped: usize,
}

/// Overwrite every numeric column of `target` that has at least one
/// parseable cell in `rows` with that column's mean.
pub fn aggregate_column_means(rows: &[DatasetRow], target: &mut FeatureVector) -> AggregationReport {
    let mut report = AggregationReport::default();

    for column in NumericColumn::ALL {
        let name = column.name();
        let mut values = Vec::with_capacity(rows.len());
        for row in rows {
            match row.numeric(name) {
                Some(v) => values.push(v),
                None if row.has_cell(name) => report.cells_skipped += 1,
                None => {}
            }
        }
        if values.is_empty() {
            continue;
        }
        target.set(column, Statistics::mean(values.iter()));
        report.columns_filled += 1;
    }

    report
}
