//! Training dataset loading and imputation
//!
//! Reads the usage-telemetry CSV by its named header schema, drops the
//! identifier column, and fills missing numeric cells with the column mean.
//! Schema problems are reported before any fitting is attempted.

use std::path::Path;

use csv::StringRecord;
use lifespan_core::record::{columns, UsageRecord};
use tracing::debug;

use crate::errors::TrainerError;

const NUMERIC_WIDTH: usize = columns::NUMERIC.len();

/// Loaded and imputed training records.
#[derive(Clone, Debug)]
pub struct Dataset {
    pub records: Vec<UsageRecord>,
}

/// One CSV row before imputation.
struct RawRow {
    numeric: [Option<f64>; NUMERIC_WIDTH],
    device_model: String,
    operating_system: String,
    gender: String,
}

struct ColumnIndices {
    numeric: [usize; NUMERIC_WIDTH],
    device_model: usize,
    operating_system: usize,
    gender: usize,
}

impl ColumnIndices {
    fn resolve(headers: &StringRecord) -> Result<Self, TrainerError> {
        let find = |name: &str| -> Result<usize, TrainerError> {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| TrainerError::MissingColumn(name.to_string()))
        };

        let mut numeric = [0usize; NUMERIC_WIDTH];
        for (slot, name) in numeric.iter_mut().zip(columns::NUMERIC) {
            *slot = find(name)?;
        }

        Ok(Self {
            numeric,
            device_model: find(columns::DEVICE_MODEL)?,
            operating_system: find(columns::OPERATING_SYSTEM)?,
            gender: find(columns::GENDER)?,
        })
    }
}

impl Dataset {
    /// Load the dataset from a CSV file with the named column schema.
    ///
    /// The identifier column (`User ID`) is ignored when present. Missing
    /// numeric cells are imputed with the mean of the present values in
    /// their column; a non-empty cell that does not parse is an error.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, TrainerError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path.as_ref())
            .map_err(|err| TrainerError::Dataset(err.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|err| TrainerError::Dataset(err.to_string()))?
            .clone();
        let indices = ColumnIndices::resolve(&headers)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|err| TrainerError::Dataset(err.to_string()))?;
            let line = record.position().map(|pos| pos.line()).unwrap_or(0);

            let mut numeric = [None; NUMERIC_WIDTH];
            for (slot, (&index, name)) in numeric
                .iter_mut()
                .zip(indices.numeric.iter().zip(columns::NUMERIC))
            {
                *slot = parse_numeric_cell(cell(&record, index, line)?, name, line)?;
            }

            rows.push(RawRow {
                numeric,
                device_model: cell(&record, indices.device_model, line)?.to_string(),
                operating_system: cell(&record, indices.operating_system, line)?.to_string(),
                gender: cell(&record, indices.gender, line)?.to_string(),
            });
        }

        if rows.is_empty() {
            return Err(TrainerError::EmptyDataset);
        }

        let means = column_means(&rows)?;
        debug!(rows = rows.len(), "dataset parsed, imputing missing cells");

        let records = rows
            .into_iter()
            .map(|row| {
                let filled: Vec<f64> = row
                    .numeric
                    .iter()
                    .zip(means.iter())
                    .map(|(value, mean)| value.unwrap_or(*mean))
                    .collect();

                UsageRecord {
                    app_usage_min_per_day: filled[0],
                    screen_on_hours_per_day: filled[1],
                    battery_drain_mah_per_day: filled[2],
                    apps_installed: filled[3],
                    data_usage_mb_per_day: filled[4],
                    age: filled[5],
                    gender: row.gender,
                    user_behavior_class: filled[6],
                    device_model: row.device_model,
                    operating_system: row.operating_system,
                }
            })
            .collect();

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Per-numeric-column (min, max), for logging.
    pub fn numeric_stats(&self) -> [(f64, f64); NUMERIC_WIDTH] {
        let mut stats = [(f64::INFINITY, f64::NEG_INFINITY); NUMERIC_WIDTH];

        for record in &self.records {
            for (slot, value) in stats.iter_mut().zip(record.numeric_values()) {
                slot.0 = slot.0.min(value);
                slot.1 = slot.1.max(value);
            }
        }

        stats
    }
}

fn cell<'a>(record: &'a StringRecord, index: usize, line: u64) -> Result<&'a str, TrainerError> {
    record
        .get(index)
        .ok_or_else(|| TrainerError::Dataset(format!("line {line}: row has too few columns")))
}

/// Empty and NA-like cells are missing; anything else must parse as a
/// finite number.
fn parse_numeric_cell(
    cell: &str,
    column: &str,
    line: u64,
) -> Result<Option<f64>, TrainerError> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("na") || cell.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(TrainerError::Dataset(format!(
            "line {line}: column `{column}`: `{cell}` is not numeric"
        ))),
    }
}

fn column_means(rows: &[RawRow]) -> Result<[f64; NUMERIC_WIDTH], TrainerError> {
    let mut means = [0.0; NUMERIC_WIDTH];

    for (index, (mean, column)) in means.iter_mut().zip(columns::NUMERIC).enumerate() {
        let mut sum = 0.0;
        let mut count = 0usize;
        for row in rows {
            if let Some(value) = row.numeric[index] {
                sum += value;
                count += 1;
            }
        }

        if count == 0 {
            return Err(TrainerError::Dataset(format!(
                "column `{column}` has no numeric values to impute from"
            )));
        }
        *mean = sum / count as f64;
    }

    Ok(means)
}
