//! Historical dataset: CSV ingestion and synthetic generation.
//!
//! The dataset is loaded once at startup and is read-only for the process
//! lifetime. An empty dataset is a fatal construction error — the replay
//! cursor cannot be defined over zero rows.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::config::defaults;
use crate::types::ProcessRow;

/// CSV header written by the exporter and expected on load.
pub const CSV_HEADER: &str = "Temperature,Impeller_Speed,pH,Dissolved_Oxygen,Yield";

/// Dataset construction errors. All are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset contains no rows")]
    Empty,
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable ordered sequence of historical process rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Vec<ProcessRow>,
}

impl Dataset {
    /// Build a dataset from pre-parsed rows. Fails on zero rows.
    pub fn from_rows(rows: Vec<ProcessRow>) -> Result<Self, DatasetError> {
        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }
        Ok(Self { rows })
    }

    /// Load process rows from a CSV file.
    ///
    /// Expected format (matching the batch exporter):
    /// `Temperature,Impeller_Speed,pH,Dissolved_Oxygen,Yield`
    ///
    /// Malformed lines are skipped with a warning; a file that yields zero
    /// valid rows is a fatal error.
    pub fn load_csv(path: &str) -> Result<Self, DatasetError> {
        let file = File::open(path).map_err(|e| DatasetError::Io {
            path: path.to_string(),
            source: e,
        })?;

        let reader = BufReader::new(file);
        let mut rows = Vec::new();
        let mut line_num = 0usize;

        for line_result in reader.lines() {
            line_num += 1;

            let line = match line_result {
                Ok(l) => l,
                Err(e) => {
                    tracing::warn!(line = line_num, error = %e, "Error reading CSV line");
                    continue;
                }
            };

            // Skip header line
            if line_num == 1 && line.starts_with("Temperature") {
                continue;
            }

            // Skip empty lines
            if line.trim().is_empty() {
                continue;
            }

            match parse_csv_line(&line, rows.len()) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    tracing::warn!(line = line_num, error = %e, "Error parsing CSV line");
                }
            }
        }

        tracing::info!(count = rows.len(), path = %path, "Loaded process rows from CSV");
        Self::from_rows(rows)
    }

    /// Generate a reproducible synthetic dataset.
    ///
    /// Distributions match the recorded plant behaviour: temperature
    /// N(37, 0.5), impeller N(250, 10), pH N(7, 0.1), dissolved oxygen
    /// N(30, 2), yield N(85, 5). Two faults are injected for demo and test
    /// purposes: an over-temperature row and a stirrer-failure row.
    pub fn synthetic(n_rows: usize) -> Result<Self, DatasetError> {
        if n_rows == 0 {
            return Err(DatasetError::Empty);
        }

        let mut rng = StdRng::seed_from_u64(defaults::SYNTHETIC_SEED);
        // Standard deviations are positive constants, so construction cannot fail.
        let temp_dist = Normal::new(37.0, 0.5).expect("positive std dev");
        let rpm_dist = Normal::new(250.0, 10.0).expect("positive std dev");
        let ph_dist = Normal::new(7.0, 0.1).expect("positive std dev");
        let do2_dist = Normal::new(30.0, 2.0).expect("positive std dev");
        let yield_dist = Normal::new(85.0, 5.0).expect("positive std dev");

        let mut rows: Vec<ProcessRow> = (0..n_rows)
            .map(|index| ProcessRow {
                temperature: temp_dist.sample(&mut rng),
                impeller_rpm: rpm_dist.sample(&mut rng),
                ph: ph_dist.sample(&mut rng),
                dissolved_oxygen: do2_dist.sample(&mut rng),
                yield_percent: yield_dist.sample(&mut rng),
                index,
            })
            .collect();

        // Injected faults: one batch running too hot, one stirrer failure.
        if let Some(row) = rows.get_mut(defaults::SYNTHETIC_HOT_ROW) {
            row.temperature = 42.0;
        }
        if let Some(row) = rows.get_mut(defaults::SYNTHETIC_STALL_ROW) {
            row.impeller_rpm = 50.0;
        }

        tracing::info!(count = rows.len(), "Generated synthetic process dataset");
        Self::from_rows(rows)
    }

    /// Number of rows. Always at least 1 by construction.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// A constructed dataset is never empty; kept for API completeness.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`, which callers keep in `[0, len)`.
    pub fn get(&self, index: usize) -> Option<&ProcessRow> {
        self.rows.get(index)
    }

    /// All rows, oldest first.
    pub fn rows(&self) -> &[ProcessRow] {
        &self.rows
    }

    /// Render the dataset back to CSV for the report-export endpoint.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(self.rows.len() * 48 + CSV_HEADER.len() + 1);
        out.push_str(CSV_HEADER);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{:.4},{:.4},{:.4},{:.4},{:.4}\n",
                row.temperature, row.impeller_rpm, row.ph, row.dissolved_oxygen, row.yield_percent
            ));
        }
        out
    }

    /// Load from CSV when a path is given, otherwise generate synthetic rows.
    pub fn load_or_synthetic(csv_path: Option<&str>, n_rows: usize) -> Result<Self, DatasetError> {
        match csv_path {
            Some(path) => {
                tracing::info!(path = %path, "Loading historical dataset from CSV");
                Self::load_csv(path)
            }
            None => {
                tracing::info!(rows = n_rows, "No CSV given — using synthetic dataset");
                Self::synthetic(n_rows)
            }
        }
    }
}

/// Parse a single CSV line into a `ProcessRow`.
fn parse_csv_line(line: &str, index: usize) -> Result<ProcessRow, String> {
    let fields: Vec<&str> = line.split(',').collect();

    if fields.len() < 5 {
        return Err(format!("expected at least 5 fields, got {}", fields.len()));
    }

    Ok(ProcessRow {
        temperature: parse_f64(fields[0], "Temperature")?,
        impeller_rpm: parse_f64(fields[1], "Impeller_Speed")?,
        ph: parse_f64(fields[2], "pH")?,
        dissolved_oxygen: parse_f64(fields[3], "Dissolved_Oxygen")?,
        yield_percent: parse_f64(fields[4], "Yield")?,
        index,
    })
}

/// Parse a string to f64 with the field name for error messages.
fn parse_f64(s: &str, field: &str) -> Result<f64, String> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| format!("cannot parse {field} as f64: '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_rows_is_fatal() {
        assert!(matches!(
            Dataset::from_rows(Vec::new()),
            Err(DatasetError::Empty)
        ));
    }

    #[test]
    fn test_synthetic_zero_rows_is_fatal() {
        assert!(matches!(Dataset::synthetic(0), Err(DatasetError::Empty)));
    }

    #[test]
    fn test_synthetic_is_reproducible() {
        let a = Dataset::synthetic(50).unwrap();
        let b = Dataset::synthetic(50).unwrap();
        assert_eq!(a.rows(), b.rows());
    }

    #[test]
    fn test_synthetic_injected_faults() {
        let data = Dataset::synthetic(defaults::SYNTHETIC_ROWS).unwrap();
        assert_eq!(data.get(defaults::SYNTHETIC_HOT_ROW).unwrap().temperature, 42.0);
        assert_eq!(
            data.get(defaults::SYNTHETIC_STALL_ROW).unwrap().impeller_rpm,
            50.0
        );
    }

    #[test]
    fn test_synthetic_values_near_setpoints() {
        let data = Dataset::synthetic(defaults::SYNTHETIC_ROWS).unwrap();
        for row in data.rows() {
            if row.index == defaults::SYNTHETIC_HOT_ROW {
                continue;
            }
            assert!(row.temperature > 30.0 && row.temperature < 44.0);
            assert!(row.ph > 6.0 && row.ph < 8.0);
        }
    }

    #[test]
    fn test_load_csv_skips_header_and_bad_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{CSV_HEADER}").unwrap();
        writeln!(file, "37.1,250.0,7.02,30.5,84.2").unwrap();
        writeln!(file, "not,a,valid,row,here").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "36.9,248.0,6.98,29.8,86.1").unwrap();

        let data = Dataset::load_csv(file.path().to_str().unwrap()).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.get(0).unwrap().temperature, 37.1);
        assert_eq!(data.get(1).unwrap().index, 1);
    }

    #[test]
    fn test_load_csv_empty_file_is_fatal() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = Dataset::load_csv(file.path().to_str().unwrap());
        assert!(matches!(result, Err(DatasetError::Empty)));
    }

    #[test]
    fn test_load_csv_missing_file_is_io_error() {
        let result = Dataset::load_csv("/nonexistent/bioreactor-yields.csv");
        assert!(matches!(result, Err(DatasetError::Io { .. })));
    }

    #[test]
    fn test_csv_round_trip() {
        let data = Dataset::synthetic(10).unwrap();
        let csv = data.to_csv();
        assert!(csv.starts_with(CSV_HEADER));
        assert_eq!(csv.lines().count(), 11);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(csv.as_bytes()).unwrap();
        let reloaded = Dataset::load_csv(file.path().to_str().unwrap()).unwrap();
        assert_eq!(reloaded.len(), 10);
    }
}
